// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use common::value::Val;

use crate::StoreError;

/// A handle to a document owned by a store.
#[async_trait]
pub trait StoreDocument: Send + Sync + Sized + 'static {
    fn get(&self, field: &str) -> Option<&Val>;

    /// All populated fields as a `Val::Object`.
    fn to_val(&self) -> Val;

    /// Delete this document, running the store's lifecycle hooks.
    ///
    /// Returns the deleted document, or `None` if it no longer existed.
    async fn remove(&self) -> Result<Option<Self>, StoreError>;
}
