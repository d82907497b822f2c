// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::types::TypeDefinition;
use async_trait::async_trait;
use core_model::{
    model_type::register_model_type,
    naming::remove_payload_type_name,
    primitive_type::PrimitiveType,
    schema::{ModelSchema, SchemaError},
    type_normalization::{field_definition, named_type, object_type_definition},
    type_registry::TypeRegistry,
};
use core_resolver::{
    OperationKind, RemovePayload, ResolveParams, Resolver, ResolverDescriptor, ResolverError,
};
use doc_store::{DocumentStore, Projection, StoreDocument};
use tracing::{debug, instrument, warn};

use crate::find_by_id::FindByIdResolver;

pub const REMOVE_BY_ID_RESOLVER_NAME: &str = "removeById";

pub const RECORD_ID_FIELD_NAME: &str = "recordId";
pub const RECORD_FIELD_NAME: &str = "record";

/// Mutation deleting a single document by identifier.
///
/// The document is fetched in full (whatever projection the caller asked for), offered to the
/// caller's `before_record_mutate` hook, and then deleted through its own `remove`, so the store's
/// lifecycle hooks run.
pub struct RemoveByIdResolver<S: DocumentStore> {
    find_by_id: FindByIdResolver<S>,
    descriptor: ResolverDescriptor,
}

impl<S: DocumentStore> RemoveByIdResolver<S> {
    pub fn new(
        schema: &ModelSchema,
        store: Arc<S>,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let find_by_id = FindByIdResolver::new(schema, store, registry)?;
        let payload = register_payload_type(schema, find_by_id.arguments().id_type(), registry)?;

        let descriptor = ResolverDescriptor {
            name: REMOVE_BY_ID_RESOLVER_NAME.to_string(),
            kind: OperationKind::Mutation,
            description: Some(format!(
                "Remove a {} document by identifier and return it",
                schema.name()
            )),
            args: vec![find_by_id.arguments().id_arg()],
            output_type: named_type(payload.name.node.as_str(), true),
            output_definition: Some(payload),
        };

        Ok(Self {
            find_by_id,
            descriptor,
        })
    }
}

fn register_payload_type(
    schema: &ModelSchema,
    id_type: PrimitiveType,
    registry: &TypeRegistry,
) -> Result<Arc<TypeDefinition>, SchemaError> {
    let record_type = register_model_type(schema, registry)?;

    registry.register(object_type_definition(
        &remove_payload_type_name(schema.name()),
        None,
        vec![
            field_definition(
                RECORD_ID_FIELD_NAME,
                vec![],
                named_type(id_type.name(), true),
                Some("Identifier of the removed document"),
            ),
            field_definition(
                RECORD_FIELD_NAME,
                vec![],
                named_type(record_type.name.node.as_str(), true),
                Some("The removed document"),
            ),
        ],
    ))
}

#[async_trait]
impl<S: DocumentStore> Resolver for RemoveByIdResolver<S> {
    type Document = S::Document;
    type Output = RemovePayload<S::Document>;

    fn descriptor(&self) -> &ResolverDescriptor {
        &self.descriptor
    }

    #[instrument(name = "RemoveByIdResolver::resolve", skip_all)]
    async fn resolve(
        &self,
        params: &ResolveParams<S::Document>,
    ) -> Result<RemovePayload<S::Document>, ResolverError> {
        let record_id = self.find_by_id.record_id();

        self.descriptor.validate_args(&params.args)?;
        let id = self
            .find_by_id
            .arguments()
            .parse_id(params.args.get(record_id.id_field()))?;

        // The hook and the payload need every field, regardless of the caller's projection
        let delegated = params.delegated(Projection::all());
        let document = self.find_by_id.resolve(&delegated).await?;

        let document = match &delegated.before_record_mutate {
            Some(hook) => hook
                .before_record_mutate(document, &delegated)
                .await
                .map_err(|e| {
                    debug!(%id, "before_record_mutate refused removal: {e}");
                    ResolverError::Hook(e)
                })?,
            None => document,
        };

        let Some(document) = document else {
            return Err(ResolverError::NotFound(id.to_string()));
        };

        let Some(removed) = document.remove().await? else {
            warn!(%id, "Document vanished before it could be removed");
            return Err(ResolverError::NotFound(id.to_string()));
        };

        Ok(RemovePayload {
            record_id: record_id.extract_id(&removed),
            record: Some(removed),
        })
    }
}
