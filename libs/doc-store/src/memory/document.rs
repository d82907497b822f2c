// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use common::value::Val;
use tracing::{debug, warn};

use super::{Collection, matcher::Record};
use crate::{StoreDocument, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    /// Created but never saved
    New,
    /// Loaded with every field
    Loaded,
    /// Loaded through a projection; saving would drop the missing fields
    Partial,
}

/// A document of a [`super::MemoryStore`].
#[derive(Clone)]
pub struct MemoryDocument {
    fields: Record,
    state: DocumentState,
    collection: Arc<Collection>,
}

impl MemoryDocument {
    pub(super) fn unsaved(fields: Record, collection: Arc<Collection>) -> Self {
        Self {
            fields,
            state: DocumentState::New,
            collection,
        }
    }

    pub(super) fn loaded(fields: Record, collection: Arc<Collection>) -> Self {
        Self {
            fields,
            state: DocumentState::Loaded,
            collection,
        }
    }

    pub(super) fn partial(fields: Record, collection: Arc<Collection>) -> Self {
        Self {
            fields,
            state: DocumentState::Partial,
            collection,
        }
    }

    pub fn id(&self) -> &Val {
        const NULL: &Val = &Val::Null;
        self.fields.get(self.collection.id_field()).unwrap_or(NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Val>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn is_new(&self) -> bool {
        self.state == DocumentState::New
    }

    /// Insert (for a new document) or replace the stored version of this document.
    pub async fn save(self) -> Result<Self, StoreError> {
        match self.state {
            DocumentState::New => self.collection.insert(self.fields.clone())?,
            DocumentState::Loaded => self.collection.replace(self.fields.clone())?,
            DocumentState::Partial => {
                return Err(StoreError::Validation(format!(
                    "Document {} was loaded with a projection and cannot be saved",
                    self.id()
                )));
            }
        }

        Ok(Self {
            state: DocumentState::Loaded,
            ..self
        })
    }
}

#[async_trait]
impl StoreDocument for MemoryDocument {
    fn get(&self, field: &str) -> Option<&Val> {
        self.fields.get(field)
    }

    fn to_val(&self) -> Val {
        Val::Object(self.fields.clone())
    }

    async fn remove(&self) -> Result<Option<Self>, StoreError> {
        let collection = &self.collection;

        collection.run_hooks(collection.pre_remove_hooks(), self)?;

        match collection.remove(self.id())? {
            Some(fields) => {
                let removed = MemoryDocument::loaded(fields, collection.clone());
                // The delete has happened; a failing post-remove hook cannot undo it
                if let Err(error) = collection.run_hooks(collection.post_remove_hooks(), &removed) {
                    warn!(
                        collection = collection.name(),
                        id = %removed.id(),
                        %error,
                        "post-remove hook failed"
                    );
                }
                Ok(Some(removed))
            }
            None => {
                debug!(
                    collection = collection.name(),
                    id = %self.id(),
                    "document already removed"
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("collection", &self.collection.name())
            .field("fields", &self.fields)
            .field("state", &self.state)
            .finish()
    }
}
