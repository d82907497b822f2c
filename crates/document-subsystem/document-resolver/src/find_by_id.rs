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
use tracing::{debug, instrument};

use crate::{args_builder::ArgumentSchema, record_id::RecordIdAccessor};

pub const FIND_BY_ID_RESOLVER_NAME: &str = "findById";

/// Query for a single document by its identifier.
pub struct FindByIdResolver<S: DocumentStore> {
    store: Arc<S>,
    arguments: ArgumentSchema,
    record_id: RecordIdAccessor,
    descriptor: ResolverDescriptor,
}

impl<S: DocumentStore> FindByIdResolver<S> {
    pub fn new(
        schema: &ModelSchema,
        store: Arc<S>,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let arguments = ArgumentSchema::new(schema, registry)?;
        let output_definition = register_model_type(schema, registry)?;

        let descriptor = ResolverDescriptor {
            name: FIND_BY_ID_RESOLVER_NAME.to_string(),
            kind: OperationKind::Query,
            description: Some(format!("Find a {} document by identifier", schema.name())),
            args: vec![arguments.id_arg()],
            output_type: named_type(schema.name(), true),
            output_definition: Some(output_definition),
        };

        Ok(Self {
            store,
            record_id: RecordIdAccessor::new(schema.id_field()),
            arguments,
            descriptor,
        })
    }

    pub fn arguments(&self) -> &ArgumentSchema {
        &self.arguments
    }

    pub fn record_id(&self) -> &RecordIdAccessor {
        &self.record_id
    }
}

#[async_trait]
impl<S: DocumentStore> Resolver for FindByIdResolver<S> {
    type Document = S::Document;
    type Output = Option<S::Document>;

    fn descriptor(&self) -> &ResolverDescriptor {
        &self.descriptor
    }

    #[instrument(name = "FindByIdResolver::resolve", skip_all)]
    async fn resolve(
        &self,
        params: &ResolveParams<S::Document>,
    ) -> Result<Option<S::Document>, ResolverError> {
        self.descriptor.validate_args(&params.args)?;
        let id = self
            .arguments
            .parse_id(params.args.get(self.record_id.id_field()))?;

        debug!(collection = self.store.collection_name(), %id, "findById");

        let filter = self.record_id.id_filter(id);
        Ok(self.store.find_one(&filter, &params.projection).await?)
    }
}
