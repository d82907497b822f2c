// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An in-process [`DocumentStore`].
//!
//! Documents live in insertion order, which is also the natural order of unsorted queries.
//! Deleting through [`StoreDocument::remove`] runs the registered pre-remove hooks (any of which
//! may veto the delete) and then the post-remove hooks. A failing post-remove hook is logged and
//! the removed document is still returned.

mod document;
mod matcher;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use common::{
    env_const::{get_store_apply_projection, get_store_default_limit},
    value::Val,
};
use doc_env::{EnvError, Environment, SystemEnvironment};
use tracing::debug;

use crate::{DocumentStore, Filter, FindQuery, Projection, StoreError};

pub use document::MemoryDocument;
use matcher::Record;

pub type LifecycleHook = Arc<dyn Fn(&MemoryDocument) -> Result<(), StoreError> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Applied when a query has no limit. `None` returns every matching document.
    pub default_limit: Option<usize>,
    /// When false, projections are ignored and complete documents are returned.
    pub apply_projection: bool,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            default_limit: None,
            apply_projection: true,
        }
    }
}

impl MemoryStoreConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            default_limit: get_store_default_limit(env)?,
            apply_projection: get_store_apply_projection(env)?,
        })
    }

    /// Configuration read from the process environment
    pub fn from_system_env() -> Result<Self, EnvError> {
        Self::from_env(&SystemEnvironment)
    }
}

/// A cheaply cloneable handle to one in-memory collection.
#[derive(Clone)]
pub struct MemoryStore {
    collection: Arc<Collection>,
}

pub(crate) struct Collection {
    name: String,
    id_field: String,
    config: MemoryStoreConfig,
    records: RwLock<Vec<Record>>,
    pre_remove: RwLock<Vec<LifecycleHook>>,
    post_remove: RwLock<Vec<LifecycleHook>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self::with_config(name, id_field, MemoryStoreConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        id_field: impl Into<String>,
        config: MemoryStoreConfig,
    ) -> Self {
        Self {
            collection: Arc::new(Collection {
                name: name.into(),
                id_field: id_field.into(),
                config,
                records: RwLock::new(vec![]),
                pre_remove: RwLock::new(vec![]),
                post_remove: RwLock::new(vec![]),
            }),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.collection.id_field
    }

    pub fn config(&self) -> &MemoryStoreConfig {
        &self.collection.config
    }

    /// Create an unsaved document from a `Val::Object`, assigning an identifier if it has none.
    pub fn new_document(&self, fields: Val) -> Result<MemoryDocument, StoreError> {
        let mut fields = match fields {
            Val::Object(fields) => fields,
            other => {
                return Err(StoreError::Validation(format!(
                    "A document must be an object, got {}",
                    other.kind_name()
                )));
            }
        };

        let id_field = &self.collection.id_field;
        if fields.get(id_field).is_none_or(Val::is_null) {
            let id = Val::String(uuid::Uuid::now_v7().simple().to_string());
            fields.shift_insert(0, id_field.clone(), id);
        }

        Ok(MemoryDocument::unsaved(fields, self.collection.clone()))
    }

    /// Create and save a document.
    pub async fn insert(&self, fields: Val) -> Result<MemoryDocument, StoreError> {
        self.new_document(fields)?.save().await
    }

    /// Register a hook that runs before an instance delete; an error vetoes the delete.
    pub fn on_pre_remove(
        &self,
        hook: impl Fn(&MemoryDocument) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Result<(), StoreError> {
        self.collection.hooks_mut(&self.collection.pre_remove)?.push(Arc::new(hook));
        Ok(())
    }

    /// Register a hook that runs after an instance delete succeeded. Its error is logged, not
    /// returned, since the document is already gone.
    pub fn on_post_remove(
        &self,
        hook: impl Fn(&MemoryDocument) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Result<(), StoreError> {
        self.collection.hooks_mut(&self.collection.post_remove)?.push(Arc::new(hook));
        Ok(())
    }

    fn find_matching(&self, query: &FindQuery) -> Result<Vec<MemoryDocument>, StoreError> {
        let records = self.collection.read()?;

        let mut matching: Vec<&Record> = records
            .iter()
            .filter(|record| matcher::matches(record, &query.filter))
            .collect();

        if let Some(sort) = &query.sort {
            matching.sort_by(|left, right| matcher::compare(left, right, sort));
        }

        // A zero limit, like an absent one, does not cap the result
        let limit = query
            .limit
            .or(self.collection.config.default_limit)
            .filter(|limit| *limit > 0)
            .unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(query.skip.unwrap_or(0))
            .take(limit)
            .map(|record| self.collection.materialize(record, &query.projection))
            .collect())
    }

    fn find_first(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Option<MemoryDocument>, StoreError> {
        let records = self.collection.read()?;

        Ok(records
            .iter()
            .find(|record| matcher::matches(record, filter))
            .map(|record| self.collection.materialize(record, projection)))
    }

    fn count_matching(&self, filter: &Filter) -> Result<usize, StoreError> {
        let records = self.collection.read()?;

        Ok(records
            .iter()
            .filter(|record| matcher::matches(record, filter))
            .count())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Document = MemoryDocument;

    fn collection_name(&self) -> &str {
        &self.collection.name
    }

    async fn find(&self, query: FindQuery) -> Result<Vec<MemoryDocument>, StoreError> {
        let documents = self.find_matching(&query)?;
        debug!(
            collection = %self.collection.name,
            found = documents.len(),
            "find"
        );
        Ok(documents)
    }

    async fn find_one(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Option<MemoryDocument>, StoreError> {
        self.find_first(filter, projection)
    }

    async fn count(&self, filter: &Filter) -> Result<usize, StoreError> {
        self.count_matching(filter)
    }
}

impl Collection {
    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Record>>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Record>>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))
    }

    fn hooks_mut<'a>(
        &self,
        hooks: &'a RwLock<Vec<LifecycleHook>>,
    ) -> Result<RwLockWriteGuard<'a, Vec<LifecycleHook>>, StoreError> {
        hooks
            .write()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))
    }

    fn materialize(self: &Arc<Self>, record: &Record, projection: &Projection) -> MemoryDocument {
        if self.config.apply_projection && !projection.is_all() {
            MemoryDocument::partial(
                matcher::project(record, projection, &self.id_field),
                self.clone(),
            )
        } else {
            MemoryDocument::loaded(record.clone(), self.clone())
        }
    }

    fn position(records: &[Record], id_field: &str, id: &Val) -> Option<usize> {
        records
            .iter()
            .position(|record| record.get(id_field) == Some(id))
    }

    pub(crate) fn insert(&self, record: Record) -> Result<(), StoreError> {
        let id = record.get(&self.id_field).cloned().unwrap_or(Val::Null);
        let mut records = self.write()?;

        if Self::position(&records, &self.id_field, &id).is_some() {
            return Err(StoreError::DuplicateKey(id.to_string()));
        }
        records.push(record);
        Ok(())
    }

    pub(crate) fn replace(&self, record: Record) -> Result<(), StoreError> {
        let id = record.get(&self.id_field).cloned().unwrap_or(Val::Null);
        let mut records = self.write()?;

        match Self::position(&records, &self.id_field, &id) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        Ok(())
    }

    pub(crate) fn remove(&self, id: &Val) -> Result<Option<Record>, StoreError> {
        let mut records = self.write()?;

        Ok(Self::position(&records, &self.id_field, id).map(|index| records.remove(index)))
    }

    pub(crate) fn run_hooks(
        &self,
        hooks: &RwLock<Vec<LifecycleHook>>,
        document: &MemoryDocument,
    ) -> Result<(), StoreError> {
        // Release the lock before running hooks so that a hook may register further hooks
        let hooks: Vec<LifecycleHook> = hooks
            .read()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))?
            .clone();

        hooks.iter().try_for_each(|hook| hook(document))
    }

    pub(crate) fn id_field(&self) -> &str {
        &self.id_field
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn pre_remove_hooks(&self) -> &RwLock<Vec<LifecycleHook>> {
        &self.pre_remove
    }

    pub(crate) fn post_remove_hooks(&self) -> &RwLock<Vec<LifecycleHook>> {
        &self.post_remove
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{SortDirection, SortSpec, StoreDocument};
    use common::env_const::{DOC_STORE_APPLY_PROJECTION, DOC_STORE_DEFAULT_LIMIT};
    use doc_env::MapEnvironment;
    use indexmap::IndexMap;

    fn user(name: &str, gender: &str) -> Val {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), Val::from(name));
        fields.insert("gender".to_string(), Val::from(gender));
        Val::Object(fields)
    }

    async fn seeded(config: MemoryStoreConfig) -> MemoryStore {
        let store = MemoryStore::with_config("users", "_id", config);
        for (name, gender) in [("a", "male"), ("b", "female"), ("c", "male")] {
            store.insert(user(name, gender)).await.unwrap();
        }
        store
    }

    fn names(documents: &[MemoryDocument]) -> Vec<String> {
        documents
            .iter()
            .map(|document| match document.get("name") {
                Some(Val::String(name)) => name.clone(),
                other => panic!("Unexpected name {other:?}"),
            })
            .collect()
    }

    #[test_log::test(tokio::test)]
    async fn natural_order_skip_and_limit() {
        let store = seeded(MemoryStoreConfig::default()).await;

        let all = store.find(FindQuery::default()).await.unwrap();
        assert_eq!(names(&all), vec!["a", "b", "c"]);

        let page = store
            .find(FindQuery::default().limit(1).skip(1))
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["b"]);

        let unlimited = store.find(FindQuery::default().limit(0)).await.unwrap();
        assert_eq!(unlimited.len(), 3);
    }

    #[tokio::test]
    async fn sort_then_skip() {
        let store = seeded(MemoryStoreConfig::default()).await;

        let sorted = store
            .find(
                FindQuery::new(Filter::new().eq("gender", "male"))
                    .sort(SortSpec::by("name", SortDirection::Desc))
                    .skip(1),
            )
            .await
            .unwrap();

        assert_eq!(names(&sorted), vec!["a"]);
    }

    #[tokio::test]
    async fn default_limit_from_env() {
        let env = MapEnvironment::from([("DOC_STORE_DEFAULT_LIMIT", "2")]);
        let store = seeded(MemoryStoreConfig::from_env(&env).unwrap()).await;

        assert_eq!(store.find(FindQuery::default()).await.unwrap().len(), 2);
        assert_eq!(
            store.find(FindQuery::default().limit(3)).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn system_env_without_store_keys_gives_defaults() {
        let keys = [DOC_STORE_DEFAULT_LIMIT, DOC_STORE_APPLY_PROJECTION];
        if keys.iter().any(|key| std::env::var(key).is_ok()) {
            return;
        }

        let config = MemoryStoreConfig::from_system_env().unwrap();
        assert_eq!(config.default_limit, None);
        assert!(config.apply_projection);
    }

    #[tokio::test]
    async fn projection_and_partial_documents() {
        let store = seeded(MemoryStoreConfig::default()).await;

        let projected = store
            .find_one(&Filter::new().eq("name", "b"), &Projection::fields(["name"]))
            .await
            .unwrap()
            .unwrap();

        assert!(projected.get("gender").is_none());
        assert!(projected.get("_id").is_some());
        assert!(matches!(
            projected.save().await,
            Err(StoreError::Validation(_))
        ));

        let unprojected_store = seeded(MemoryStoreConfig {
            apply_projection: false,
            ..Default::default()
        })
        .await;
        let full = unprojected_store
            .find_one(&Filter::new().eq("name", "b"), &Projection::fields(["name"]))
            .await
            .unwrap()
            .unwrap();
        assert!(full.get("gender").is_some());
    }

    #[tokio::test]
    async fn duplicate_identifier_is_rejected() {
        let store = MemoryStore::new("users", "_id");
        let first = store.insert(user("a", "male")).await.unwrap();

        let mut fields = IndexMap::new();
        fields.insert("_id".to_string(), first.id().clone());
        let duplicate = store.insert(Val::Object(fields)).await;

        assert!(matches!(duplicate, Err(StoreError::DuplicateKey(_))));
        assert_eq!(store.count(&Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_runs_lifecycle_hooks() {
        let store = seeded(MemoryStoreConfig::default()).await;
        let removed_count = Arc::new(AtomicUsize::new(0));

        let counter = removed_count.clone();
        store
            .on_post_remove(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        store
            .on_pre_remove(|document| match document.get("name") {
                Some(Val::String(name)) if name == "c" => Err(StoreError::Hook {
                    hook: "pre remove",
                    message: "c is protected".to_string(),
                }),
                _ => Ok(()),
            })
            .unwrap();

        let a = store
            .find_one(&Filter::new().eq("name", "a"), &Projection::all())
            .await
            .unwrap()
            .unwrap();
        let removed = a.remove().await.unwrap().unwrap();
        assert_eq!(removed.id(), a.id());

        // Deleting again is a no-op
        assert!(a.remove().await.unwrap().is_none());

        let c = store
            .find_one(&Filter::new().eq("name", "c"), &Projection::all())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(c.remove().await, Err(StoreError::Hook { .. })));

        assert_eq!(removed_count.load(Ordering::SeqCst), 1);
        assert_eq!(store.count(&Filter::new()).await.unwrap(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn failing_post_remove_hook_keeps_the_removal() {
        let store = seeded(MemoryStoreConfig::default()).await;
        store
            .on_post_remove(|_| {
                Err(StoreError::Hook {
                    hook: "post remove",
                    message: "audit log unavailable".to_string(),
                })
            })
            .unwrap();

        let b = store
            .find_one(&Filter::new().eq("name", "b"), &Projection::all())
            .await
            .unwrap()
            .unwrap();
        let removed = b.remove().await.unwrap().unwrap();

        assert_eq!(removed.get("name"), Some(&Val::from("b")));
        assert!(
            store
                .find_one(&Filter::new().eq("name", "b"), &Projection::all())
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.count(&Filter::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn non_object_documents_are_rejected() {
        let store = MemoryStore::new("users", "_id");

        assert!(matches!(
            store.new_document(Val::from("not a document")),
            Err(StoreError::Validation(_))
        ));
    }
}
