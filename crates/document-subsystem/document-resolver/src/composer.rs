// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The full resolver family for one model.

use std::sync::Arc;

use async_graphql_parser::types::{FieldDefinition, TypeDefinition};
use common::value::Val;
use core_model::{
    model_type::register_model_type,
    naming::root_field_name,
    schema::{ModelSchema, SchemaError},
    type_registry::TypeRegistry,
};
use core_resolver::{
    OperationKind, OperationResolver, ResolveParams, ResolverError, ValidationError,
};
use doc_store::DocumentStore;
use tracing::{debug, instrument};

use crate::{
    count::{COUNT_RESOLVER_NAME, CountResolver},
    find_by_id::{FIND_BY_ID_RESOLVER_NAME, FindByIdResolver},
    find_many::{FIND_MANY_RESOLVER_NAME, FindManyResolver},
    find_one::{FIND_ONE_RESOLVER_NAME, FindOneResolver},
    remove_by_id::{REMOVE_BY_ID_RESOLVER_NAME, RemoveByIdResolver},
};

const RESOLVER_NAMES: [&str; 5] = [
    FIND_MANY_RESOLVER_NAME,
    FIND_BY_ID_RESOLVER_NAME,
    FIND_ONE_RESOLVER_NAME,
    COUNT_RESOLVER_NAME,
    REMOVE_BY_ID_RESOLVER_NAME,
];

pub struct DocumentComposer<S: DocumentStore> {
    schema: ModelSchema,
    registry: Arc<TypeRegistry>,
    object_type: Arc<TypeDefinition>,
    find_many: FindManyResolver<S>,
    find_by_id: FindByIdResolver<S>,
    find_one: FindOneResolver<S>,
    count: CountResolver<S>,
    remove_by_id: RemoveByIdResolver<S>,
}

impl<S: DocumentStore> DocumentComposer<S> {
    /// Fails if one of the model's generated type names is already registered with a different
    /// shape, such as a model named `UserContacts` next to the `contacts` object of `User`.
    pub fn new(
        schema: ModelSchema,
        store: Arc<S>,
        registry: Arc<TypeRegistry>,
    ) -> Result<Self, SchemaError> {
        let object_type = register_model_type(&schema, &registry)?;

        let composer = Self {
            find_many: FindManyResolver::new(&schema, store.clone(), &registry)?,
            find_by_id: FindByIdResolver::new(&schema, store.clone(), &registry)?,
            find_one: FindOneResolver::new(&schema, store.clone(), &registry)?,
            count: CountResolver::new(&schema, store.clone(), &registry)?,
            remove_by_id: RemoveByIdResolver::new(&schema, store, &registry)?,
            object_type,
            schema,
            registry,
        };

        debug!(
            model = composer.schema.name(),
            types = composer.registry.len(),
            "Composed document resolvers"
        );
        Ok(composer)
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn object_type(&self) -> &Arc<TypeDefinition> {
        &self.object_type
    }

    pub fn find_many(&self) -> &FindManyResolver<S> {
        &self.find_many
    }

    pub fn find_by_id(&self) -> &FindByIdResolver<S> {
        &self.find_by_id
    }

    pub fn find_one(&self) -> &FindOneResolver<S> {
        &self.find_one
    }

    pub fn count(&self) -> &CountResolver<S> {
        &self.count
    }

    pub fn remove_by_id(&self) -> &RemoveByIdResolver<S> {
        &self.remove_by_id
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        RESOLVER_NAMES.to_vec()
    }

    pub fn resolver(&self, name: &str) -> Option<&dyn OperationResolver<S::Document>> {
        match name {
            FIND_MANY_RESOLVER_NAME => Some(&self.find_many),
            FIND_BY_ID_RESOLVER_NAME => Some(&self.find_by_id),
            FIND_ONE_RESOLVER_NAME => Some(&self.find_one),
            COUNT_RESOLVER_NAME => Some(&self.count),
            REMOVE_BY_ID_RESOLVER_NAME => Some(&self.remove_by_id),
            _ => None,
        }
    }

    /// Root query fields, such as `userFindMany(...): [User!]!`
    pub fn schema_queries(&self) -> Vec<FieldDefinition> {
        self.root_fields(OperationKind::Query)
    }

    /// Root mutation fields, such as `userRemoveById(_id: ID!): RemoveByIdUserPayload`
    pub fn schema_mutations(&self) -> Vec<FieldDefinition> {
        self.root_fields(OperationKind::Mutation)
    }

    /// Every type registered so far, in registration order
    pub fn schema_types(&self) -> Vec<Arc<TypeDefinition>> {
        self.registry.type_definitions()
    }

    /// Run the resolver `name` and convert its output to a transport value.
    #[instrument(name = "DocumentComposer::resolve_field", skip(self, params))]
    pub async fn resolve_field(
        &self,
        name: &str,
        params: &ResolveParams<S::Document>,
    ) -> Result<Val, ResolverError> {
        let resolver = self
            .resolver(name)
            .ok_or_else(|| ValidationError::OperationNotFound(name.to_string()))?;

        resolver.resolve_val(params).await
    }

    fn root_fields(&self, kind: OperationKind) -> Vec<FieldDefinition> {
        RESOLVER_NAMES
            .iter()
            .filter_map(|name| self.resolver(name))
            .filter(|resolver| resolver.descriptor().kind == kind)
            .map(|resolver| {
                let descriptor = resolver.descriptor();
                resolver.field_definition(&root_field_name(self.schema.name(), &descriptor.name))
            })
            .collect()
    }
}
