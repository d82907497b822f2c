// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use doc_store::StoreError;
use thiserror::Error;

/// Error produced by a `before_record_mutate` hook. Callers may downcast it to their own type.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Required argument '{0}' not found")]
    RequiredArgumentNotFound(String),

    #[error("Argument '{argument_name}' is not valid for '{resolver_name}'")]
    UnknownArgument {
        argument_name: String,
        resolver_name: String,
    },

    #[error("Field '{field}' is not valid for type '{type_name}'")]
    UnknownField { field: String, type_name: String },

    #[error(
        "Argument '{argument_name}' is not of a valid type. Expected '{expected_type}', got '{actual_type}'"
    )]
    InvalidArgumentType {
        argument_name: String,
        expected_type: String,
        actual_type: String,
    },

    #[error("Argument '{argument_name}' must not be negative (got {value})")]
    NegativeValue { argument_name: String, value: i64 },

    #[error("Invalid sort direction '{value}' for field '{field}'; expected 1, -1, ASC or DESC")]
    InvalidSortDirection { field: String, value: String },

    #[error("No such operation '{0}'")]
    OperationNotFound(String),
}

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Hook(#[source] HookError),
}

impl ResolverError {
    /// Message suitable for the caller of an operation. Store failures are not described, since
    /// they may expose stored data.
    pub fn user_error_message(&self) -> String {
        match self {
            ResolverError::Validation(_) | ResolverError::NotFound(_) | ResolverError::Hook(_) => {
                self.to_string()
            }
            ResolverError::Store(StoreError::Hook { .. }) => self.to_string(),
            ResolverError::Store(_) => "Store operation failed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[derive(Debug, Error)]
    #[error("not allowed")]
    struct Forbidden;

    #[multiplatform_test]
    fn hook_error_is_downcastable() {
        let error = ResolverError::Hook(Box::new(Forbidden));

        match &error {
            ResolverError::Hook(source) => assert!(source.downcast_ref::<Forbidden>().is_some()),
            _ => panic!("Expected a hook error"),
        }
        assert_eq!(error.user_error_message(), "not allowed");
    }

    #[multiplatform_test]
    fn store_details_are_hidden() {
        let error = ResolverError::from(StoreError::Poisoned("users".into()));
        assert_eq!(error.user_error_message(), "Store operation failed");
    }
}
