// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Duplicate identifier {0}")]
    DuplicateKey(String),

    #[error("Lifecycle hook '{hook}' refused the operation: {message}")]
    Hook { hook: &'static str, message: String },

    #[error("Collection '{0}' is unavailable (a writer panicked)")]
    Poisoned(String),

    #[error("{0}")]
    BoxedError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}
