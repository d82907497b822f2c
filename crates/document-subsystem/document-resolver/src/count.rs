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
    primitive_type::PrimitiveType,
    schema::{ModelSchema, SchemaError},
    type_normalization::named_type,
    type_registry::TypeRegistry,
};
use core_resolver::{OperationKind, ResolveParams, Resolver, ResolverDescriptor, ResolverError};
use doc_store::DocumentStore;
use tracing::{debug, instrument};

use crate::args_builder::{ArgumentSchema, FILTER_PARAM_NAME};

pub const COUNT_RESOLVER_NAME: &str = "count";

/// Number of documents matching an optional filter.
pub struct CountResolver<S: DocumentStore> {
    store: Arc<S>,
    arguments: ArgumentSchema,
    descriptor: ResolverDescriptor,
}

impl<S: DocumentStore> CountResolver<S> {
    pub fn new(
        schema: &ModelSchema,
        store: Arc<S>,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let arguments = ArgumentSchema::new(schema, registry)?;

        let descriptor = ResolverDescriptor {
            name: COUNT_RESOLVER_NAME.to_string(),
            kind: OperationKind::Query,
            description: Some(format!(
                "Count the {} documents matching the filter",
                schema.name()
            )),
            args: vec![arguments.filter_arg()],
            output_type: named_type(PrimitiveType::Int.name(), false),
            output_definition: None,
        };

        Ok(Self {
            store,
            arguments,
            descriptor,
        })
    }
}

#[async_trait]
impl<S: DocumentStore> Resolver for CountResolver<S> {
    type Document = S::Document;
    type Output = usize;

    fn descriptor(&self) -> &ResolverDescriptor {
        &self.descriptor
    }

    #[instrument(name = "CountResolver::resolve", skip_all)]
    async fn resolve(&self, params: &ResolveParams<S::Document>) -> Result<usize, ResolverError> {
        self.descriptor.validate_args(&params.args)?;
        let filter = self.arguments.parse_filter(params.args.get(FILTER_PARAM_NAME))?;

        let count = self.store.count(&filter).await?;
        debug!(collection = self.store.collection_name(), count, "count resolved");
        Ok(count)
    }
}
