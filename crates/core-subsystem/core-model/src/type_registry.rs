// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Registry of generated GraphQL types.
//!
//! Every factory that needs a named type goes through [`TypeRegistry::get_or_create`], so building
//! resolvers for the same model twice yields the very same `Arc<TypeDefinition>` for each name.
//! The lock is held while the factory runs; two concurrent first uses of a name therefore
//! register a single definition.

use std::{
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_graphql_parser::types::TypeDefinition;
use tracing::{debug, warn};

use crate::{
    mapped_arena::MappedArena, schema::SchemaError,
    type_normalization::TypeDefinitionIntrospection,
};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Mutex<MappedArena<Arc<TypeDefinition>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition registered under `name`, creating it with `factory` on first use.
    pub fn get_or_create(
        &self,
        name: &str,
        factory: impl FnOnce() -> TypeDefinition,
    ) -> Arc<TypeDefinition> {
        match self.try_get_or_create(name, || Ok::<_, Infallible>(factory())) {
            Ok(definition) => definition,
            Err(never) => match never {},
        }
    }

    /// Like [`Self::get_or_create`], but the factory may fail; nothing is registered if it does.
    pub fn try_get_or_create<E>(
        &self,
        name: &str,
        factory: impl FnOnce() -> Result<TypeDefinition, E>,
    ) -> Result<Arc<TypeDefinition>, E> {
        let mut types = self.lock();

        if let Some(existing) = types.get_by_key(name) {
            return Ok(existing.clone());
        }

        let definition = factory()?;
        if definition.name.node.as_str() != name {
            warn!(
                registered_as = name,
                defined_as = definition.name.node.as_str(),
                "Type registered under a different name than it defines"
            );
        }

        debug!(name, "Registering type");
        let definition = Arc::new(definition);
        types.add(name, definition.clone());

        Ok(definition)
    }

    /// Register `definition` under its own name, reusing an existing definition of the same shape.
    ///
    /// Generated names can coincide for unrelated types (a model named `UserContacts` and the
    /// `contacts` object of `User`); a differently shaped definition under a taken name fails.
    pub fn register(&self, definition: TypeDefinition) -> Result<Arc<TypeDefinition>, SchemaError> {
        let name = definition.name().to_string();
        let signature = definition.signature();

        let registered = self.get_or_create(&name, move || definition);
        if registered.signature() == signature {
            Ok(registered)
        } else {
            warn!(
                name,
                registered = registered.signature(),
                requested = signature,
                "Conflicting definitions for one type name"
            );
            Err(SchemaError::ConflictingTypeDefinition(name))
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeDefinition>> {
        self.lock().get_by_key(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().get_id(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|(_, definition)| definition.name.node.to_string())
            .collect()
    }

    /// Registered definitions, in registration order
    pub fn type_definitions(&self) -> Vec<Arc<TypeDefinition>> {
        self.lock()
            .iter()
            .map(|(_, definition)| definition.clone())
            .collect()
    }

    pub fn clear(&self) {
        *self.lock() = MappedArena::default();
    }

    // A panicking factory never reached `add`, so the arena is consistent even if poisoned.
    fn lock(&self) -> MutexGuard<'_, MappedArena<Arc<TypeDefinition>>> {
        self.types.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
