// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt, sync::Arc};

use async_graphql_value::ConstValue;
use async_trait::async_trait;
use common::value::Val;
use doc_store::Projection;
use indexmap::IndexMap;

use crate::error::{HookError, ValidationError};

const ARGS_NAME: &str = "args";

/// Hook invoked by mutation resolvers after the target document is fetched and before it is
/// changed. It may substitute the document (or return `None`, which aborts with "not found"), or
/// refuse the mutation by returning an error.
#[async_trait]
pub trait BeforeRecordMutate<D>: Send + Sync {
    async fn before_record_mutate(
        &self,
        document: Option<D>,
        params: &ResolveParams<D>,
    ) -> Result<Option<D>, HookError>;
}

/// Per-invocation input to a resolver.
pub struct ResolveParams<D> {
    pub args: IndexMap<String, Val>,
    /// Fields to populate on returned documents; `Projection::all()` populates every field
    pub projection: Projection,
    pub before_record_mutate: Option<Arc<dyn BeforeRecordMutate<D>>>,
}

impl<D> ResolveParams<D> {
    pub fn new(args: IndexMap<String, Val>) -> Self {
        Self {
            args,
            projection: Projection::all(),
            before_record_mutate: None,
        }
    }

    /// Arguments given as a JSON object, as they arrive from a transport
    pub fn from_json(args: serde_json::Value) -> Result<Self, ValidationError> {
        Self::from_val(Val::from(args))
    }

    /// Arguments given as a GraphQL object value; enum values such as `ASC` stay `Val::Enum`.
    pub fn from_graphql(args: ConstValue) -> Result<Self, ValidationError> {
        let args = Val::try_from(args).map_err(|e| ValidationError::InvalidArgumentType {
            argument_name: ARGS_NAME.to_string(),
            expected_type: "Object".to_string(),
            actual_type: e.to_string(),
        })?;
        Self::from_val(args)
    }

    fn from_val(args: Val) -> Result<Self, ValidationError> {
        match args {
            Val::Object(args) => Ok(Self::new(args)),
            Val::Null => Ok(Self::new(IndexMap::new())),
            other => Err(ValidationError::InvalidArgumentType {
                argument_name: ARGS_NAME.to_string(),
                expected_type: "Object".to_string(),
                actual_type: other.kind_name().to_string(),
            }),
        }
    }

    pub fn with_projection(self, projection: Projection) -> Self {
        Self { projection, ..self }
    }

    pub fn with_hook(self, hook: Arc<dyn BeforeRecordMutate<D>>) -> Self {
        Self {
            before_record_mutate: Some(hook),
            ..self
        }
    }

    /// The argument `name`, treating an explicit `null` as absent
    pub fn arg(&self, name: &str) -> Option<&Val> {
        self.args.get(name).filter(|value| !value.is_null())
    }

    /// Parameters for a delegated call: same arguments and hook, a different projection.
    pub fn delegated(&self, projection: Projection) -> Self {
        Self {
            args: self.args.clone(),
            projection,
            before_record_mutate: self.before_record_mutate.clone(),
        }
    }
}

impl<D> Clone for ResolveParams<D> {
    fn clone(&self) -> Self {
        self.delegated(self.projection.clone())
    }
}

impl<D> fmt::Debug for ResolveParams<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("args", &self.args)
            .field("projection", &self.projection)
            .field("before_record_mutate", &self.before_record_mutate.is_some())
            .finish()
    }
}
