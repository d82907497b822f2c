// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The contract between resolvers and a document store.
//!
//! Resolvers never talk to a concrete store. They build a [`FindQuery`] (or a [`Filter`] for
//! single-document lookups and counts) and hand it to a [`DocumentStore`]. Documents come back as
//! store-native handles implementing [`StoreDocument`], which keep the ability to delete
//! themselves (so that the store's lifecycle hooks run).
//!
//! The [`memory`] module provides a reference implementation that keeps documents in process.

mod document;
mod error;
pub mod memory;
mod query;
mod store;

pub use document::StoreDocument;
pub use error::StoreError;
pub use query::{Filter, FindQuery, Projection, SortDirection, SortSpec};
pub use store::DocumentStore;
