// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::value::Val;
use doc_store::{Filter, StoreDocument};

/// Reads document identifiers and builds filters addressing a single document.
///
/// Identifiers are opaque: they are only compared for equality and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdAccessor {
    id_field: String,
}

impl RecordIdAccessor {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// The document's identifier (`Val::Null` if it has none).
    pub fn extract_id<D: StoreDocument>(&self, document: &D) -> Val {
        document.get(&self.id_field).cloned().unwrap_or(Val::Null)
    }

    pub fn id_filter(&self, id: Val) -> Filter {
        Filter::new().eq(self.id_field.clone(), id)
    }

    pub fn matches<D: StoreDocument>(&self, document: &D, id: &Val) -> bool {
        document.get(&self.id_field) == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_store::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn reads_and_addresses_identifiers() {
        let store = MemoryStore::new("users", "uid");
        let document = store
            .insert(Val::from(json!({"uid": 7, "name": "userName1"})))
            .await
            .unwrap();

        let accessor = RecordIdAccessor::new("uid");
        assert_eq!(accessor.extract_id(&document), Val::from(7i64));
        assert!(accessor.matches(&document, &Val::from(7i64)));
        assert!(!accessor.matches(&document, &Val::from("7")));

        let filter = accessor.id_filter(Val::from(7i64));
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get("uid"), Some(&Val::from(7i64)));

        assert_eq!(RecordIdAccessor::new("_id").extract_id(&document), Val::Null);
    }
}
