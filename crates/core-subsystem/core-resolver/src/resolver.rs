// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::types::{FieldDefinition, InputValueDefinition, Type, TypeDefinition};
use async_trait::async_trait;
use common::value::Val;
use core_model::type_normalization::field_definition;
use doc_store::StoreDocument;
use indexmap::IndexMap;

use crate::{
    error::{ResolverError, ValidationError},
    resolve_params::ResolveParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// The declared contract of a resolver: its name, arguments and output type.
#[derive(Debug, Clone)]
pub struct ResolverDescriptor {
    pub name: String,
    pub kind: OperationKind,
    pub description: Option<String>,
    pub args: Vec<InputValueDefinition>,
    pub output_type: Type,
    /// The named type behind `output_type`, unless it is a built-in scalar
    pub output_definition: Option<Arc<TypeDefinition>>,
}

impl ResolverDescriptor {
    pub fn has_arg(&self, name: &str) -> bool {
        self.args.iter().any(|arg| arg.name.node.as_str() == name)
    }

    pub fn arg_names(&self) -> Vec<&str> {
        self.args.iter().map(|arg| arg.name.node.as_str()).collect()
    }

    pub fn validate_args(&self, args: &IndexMap<String, Val>) -> Result<(), ValidationError> {
        match args.keys().find(|name| !self.has_arg(name)) {
            Some(stray) => Err(ValidationError::UnknownArgument {
                argument_name: stray.clone(),
                resolver_name: self.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The root field exposing this resolver, such as `userFindMany(filter: ...): [User!]!`
    pub fn field_definition(&self, field_name: &str) -> FieldDefinition {
        field_definition(
            field_name,
            self.args.clone(),
            self.output_type.clone(),
            self.description.as_deref(),
        )
    }
}

#[async_trait]
pub trait Resolver: Send + Sync {
    type Document: StoreDocument;
    type Output: Send;

    fn descriptor(&self) -> &ResolverDescriptor;

    fn has_arg(&self, name: &str) -> bool {
        self.descriptor().has_arg(name)
    }

    async fn resolve(
        &self,
        params: &ResolveParams<Self::Document>,
    ) -> Result<Self::Output, ResolverError>;
}

/// Payload of a delete-by-identifier mutation
#[derive(Debug)]
pub struct RemovePayload<D> {
    pub record: Option<D>,
    pub record_id: Val,
}

/// Conversion of resolver output into a transport value
pub trait IntoVal {
    fn into_val(self) -> Val;
}

impl<D: StoreDocument> IntoVal for Vec<D> {
    fn into_val(self) -> Val {
        Val::List(self.iter().map(StoreDocument::to_val).collect())
    }
}

impl<D: StoreDocument> IntoVal for Option<D> {
    fn into_val(self) -> Val {
        self.map(|document| document.to_val()).unwrap_or(Val::Null)
    }
}

impl<D: StoreDocument> IntoVal for RemovePayload<D> {
    fn into_val(self) -> Val {
        let mut payload = IndexMap::new();
        payload.insert("recordId".to_string(), self.record_id);
        payload.insert("record".to_string(), self.record.into_val());
        Val::Object(payload)
    }
}

impl IntoVal for usize {
    fn into_val(self) -> Val {
        Val::from(self)
    }
}

/// Object-safe view of a [`Resolver`] over documents `D`, used to expose heterogeneous resolvers
/// under one registration surface.
#[async_trait]
pub trait OperationResolver<D: StoreDocument>: Send + Sync {
    fn descriptor(&self) -> &ResolverDescriptor;

    async fn resolve_val(&self, params: &ResolveParams<D>) -> Result<Val, ResolverError>;

    fn field_definition(&self, field_name: &str) -> FieldDefinition {
        self.descriptor().field_definition(field_name)
    }
}

#[async_trait]
impl<R> OperationResolver<R::Document> for R
where
    R: Resolver,
    R::Output: IntoVal,
{
    fn descriptor(&self) -> &ResolverDescriptor {
        Resolver::descriptor(self)
    }

    async fn resolve_val(&self, params: &ResolveParams<R::Document>) -> Result<Val, ResolverError> {
        Ok(self.resolve(params).await?.into_val())
    }
}
