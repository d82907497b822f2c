// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use core_model::{
    model_type::register_model_type,
    schema::{ModelSchema, SchemaError},
    type_normalization::{list_type, named_type},
    type_registry::TypeRegistry,
};
use core_resolver::{OperationKind, ResolveParams, Resolver, ResolverDescriptor, ResolverError};
use doc_store::DocumentStore;
use tracing::{debug, instrument, warn};

use crate::args_builder::ArgumentSchema;

pub const FIND_MANY_RESOLVER_NAME: &str = "findMany";

/// Query for the documents matching an optional filter, with sorting and pagination.
///
/// `skip` is always applied before `limit`, whatever the order of the arguments.
pub struct FindManyResolver<S: DocumentStore> {
    store: Arc<S>,
    arguments: ArgumentSchema,
    descriptor: ResolverDescriptor,
}

impl<S: DocumentStore> FindManyResolver<S> {
    pub fn new(
        schema: &ModelSchema,
        store: Arc<S>,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let arguments = ArgumentSchema::new(schema, registry)?;
        let output_definition = register_model_type(schema, registry)?;

        let descriptor = ResolverDescriptor {
            name: FIND_MANY_RESOLVER_NAME.to_string(),
            kind: OperationKind::Query,
            description: Some(format!(
                "Find {} documents matching the filter",
                schema.name()
            )),
            args: vec![
                arguments.filter_arg(),
                arguments.skip_arg(),
                arguments.limit_arg(),
                arguments.sort_arg(),
            ],
            output_type: list_type(named_type(schema.name(), false), false),
            output_definition: Some(output_definition),
        };

        Ok(Self {
            store,
            arguments,
            descriptor,
        })
    }

    pub fn arguments(&self) -> &ArgumentSchema {
        &self.arguments
    }
}

#[async_trait]
impl<S: DocumentStore> Resolver for FindManyResolver<S> {
    type Document = S::Document;
    type Output = Vec<S::Document>;

    fn descriptor(&self) -> &ResolverDescriptor {
        &self.descriptor
    }

    #[instrument(name = "FindManyResolver::resolve", skip_all)]
    async fn resolve(
        &self,
        params: &ResolveParams<S::Document>,
    ) -> Result<Vec<S::Document>, ResolverError> {
        self.descriptor.validate_args(&params.args)?;
        let query = self
            .arguments
            .collection_query(&params.args, params.projection.clone())?;

        let documents = self.store.find(query).await.inspect_err(|e| {
            warn!(collection = self.store.collection_name(), "findMany failed: {e}");
        })?;

        debug!(
            collection = self.store.collection_name(),
            count = documents.len(),
            "findMany resolved"
        );
        Ok(documents)
    }
}
