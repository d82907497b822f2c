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
    type_normalization::named_type,
    type_registry::TypeRegistry,
};
use core_resolver::{OperationKind, ResolveParams, Resolver, ResolverDescriptor, ResolverError};
use doc_store::DocumentStore;
use tracing::instrument;

use crate::args_builder::ArgumentSchema;

pub const FIND_ONE_RESOLVER_NAME: &str = "findOne";

/// Query for the first document matching an optional filter (after sorting and skipping).
pub struct FindOneResolver<S: DocumentStore> {
    store: Arc<S>,
    arguments: ArgumentSchema,
    descriptor: ResolverDescriptor,
}

impl<S: DocumentStore> FindOneResolver<S> {
    pub fn new(
        schema: &ModelSchema,
        store: Arc<S>,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let arguments = ArgumentSchema::new(schema, registry)?;
        let output_definition = register_model_type(schema, registry)?;

        let descriptor = ResolverDescriptor {
            name: FIND_ONE_RESOLVER_NAME.to_string(),
            kind: OperationKind::Query,
            description: Some(format!(
                "Find the first {} document matching the filter",
                schema.name()
            )),
            args: vec![
                arguments.filter_arg(),
                arguments.skip_arg(),
                arguments.sort_arg(),
            ],
            output_type: named_type(schema.name(), true),
            output_definition: Some(output_definition),
        };

        Ok(Self {
            store,
            arguments,
            descriptor,
        })
    }
}

#[async_trait]
impl<S: DocumentStore> Resolver for FindOneResolver<S> {
    type Document = S::Document;
    type Output = Option<S::Document>;

    fn descriptor(&self) -> &ResolverDescriptor {
        &self.descriptor
    }

    #[instrument(name = "FindOneResolver::resolve", skip_all)]
    async fn resolve(
        &self,
        params: &ResolveParams<S::Document>,
    ) -> Result<Option<S::Document>, ResolverError> {
        self.descriptor.validate_args(&params.args)?;
        let query = self
            .arguments
            .collection_query(&params.args, params.projection.clone())?
            .limit(1);

        Ok(self.store.find(query).await?.into_iter().next())
    }
}
