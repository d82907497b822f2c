// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use common::value::Val;
use core_model::{
    primitive_type::PrimitiveType,
    schema::{FieldSchema, FieldType, ModelSchema},
};
use core_resolver::ResolveParams;
use doc_store::{
    DocumentStore, Filter, FindQuery, Projection, StoreDocument, StoreError,
    memory::{MemoryDocument, MemoryStore},
};
use serde_json::json;

pub fn user_schema() -> ModelSchema {
    ModelSchema::new(
        "User",
        vec![
            FieldSchema::new("_id", FieldType::scalar(PrimitiveType::Id)).required(),
            FieldSchema::new("name", FieldType::scalar(PrimitiveType::String)).required(),
            FieldSchema::new(
                "skills",
                FieldType::list(FieldType::scalar(PrimitiveType::String)),
            )
            .with_description("List of skills"),
            FieldSchema::new("gender", FieldType::scalar(PrimitiveType::String)),
            FieldSchema::new("relocation", FieldType::scalar(PrimitiveType::Boolean)),
            FieldSchema::new("age", FieldType::scalar(PrimitiveType::Int)),
            FieldSchema::new(
                "contacts",
                FieldType::object(vec![
                    FieldSchema::new("email", FieldType::scalar(PrimitiveType::String)),
                    FieldSchema::new(
                        "phones",
                        FieldType::list(FieldType::scalar(PrimitiveType::String)),
                    ),
                ]),
            ),
        ],
    )
    .expect("valid user schema")
}

/// A store holding `userName1` and `userName2` (in that order)
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new("users", "_id");
    seed(&store).await;
    Arc::new(store)
}

pub async fn seed(store: &MemoryStore) {
    for user in [
        json!({
            "_id": "u1",
            "name": "userName1",
            "skills": ["js", "ruby", "php", "python"],
            "gender": "male",
            "relocation": true,
            "age": 30,
            "contacts": {"email": "one@example.com", "phones": ["111"]}
        }),
        json!({
            "_id": "u2",
            "name": "userName2",
            "skills": ["go", "erlang"],
            "gender": "female",
            "relocation": false,
            "age": 25,
            "contacts": {"email": "two@example.com"}
        }),
    ] {
        store.insert(Val::from(user)).await.expect("seed user");
    }
}

pub fn params(args: serde_json::Value) -> ResolveParams<MemoryDocument> {
    ResolveParams::from_json(args).expect("object arguments")
}

pub fn names(documents: &[MemoryDocument]) -> Vec<String> {
    documents.iter().map(name).collect()
}

pub fn name(document: &MemoryDocument) -> String {
    match document.get("name") {
        Some(Val::String(name)) => name.clone(),
        _ => String::new(),
    }
}

/// A store whose every operation fails, recording how often it was called
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::BoxedError("connection refused".into())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    type Document = MemoryDocument;

    fn collection_name(&self) -> &str {
        "users"
    }

    async fn find(&self, _query: FindQuery) -> Result<Vec<MemoryDocument>, StoreError> {
        Err(self.fail())
    }

    async fn find_one(
        &self,
        _filter: &Filter,
        _projection: &Projection,
    ) -> Result<Option<MemoryDocument>, StoreError> {
        Err(self.fail())
    }

    async fn count(&self, _filter: &Filter) -> Result<usize, StoreError> {
        Err(self.fail())
    }
}
