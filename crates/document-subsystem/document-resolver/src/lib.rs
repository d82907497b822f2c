// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolvers generated from a document model's schema.
//!
//! Each resolver is built once per model from a [`ModelSchema`](core_model::schema::ModelSchema),
//! a store handle and a shared [`TypeRegistry`](core_model::type_registry::TypeRegistry); the
//! registry guarantees that the GraphQL types they declare are created only once.

pub mod args_builder;
mod composer;
mod count;
mod find_by_id;
mod find_many;
mod find_one;
mod record_id;
mod remove_by_id;

pub use composer::DocumentComposer;
pub use count::{COUNT_RESOLVER_NAME, CountResolver};
pub use find_by_id::{FIND_BY_ID_RESOLVER_NAME, FindByIdResolver};
pub use find_many::{FIND_MANY_RESOLVER_NAME, FindManyResolver};
pub use find_one::{FIND_ONE_RESOLVER_NAME, FindOneResolver};
pub use record_id::RecordIdAccessor;
pub use remove_by_id::{
    RECORD_FIELD_NAME, RECORD_ID_FIELD_NAME, REMOVE_BY_ID_RESOLVER_NAME, RemoveByIdResolver,
};
