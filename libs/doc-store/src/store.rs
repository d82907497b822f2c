// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{Filter, FindQuery, Projection, StoreDocument, StoreError};

/// A collection of documents of one model.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    type Document: StoreDocument;

    /// Name of the underlying collection (used in diagnostics)
    fn collection_name(&self) -> &str;

    /// Documents matching `query.filter`, sorted, then skipped, then limited.
    async fn find(&self, query: FindQuery) -> Result<Vec<Self::Document>, StoreError>;

    /// The first document (in natural order) matching `filter`.
    async fn find_one(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Option<Self::Document>, StoreError>;

    async fn count(&self, filter: &Filter) -> Result<usize, StoreError>;
}
