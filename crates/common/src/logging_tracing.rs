// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! Resolvers and the reference store are instrumented with Rust's `tracing` framework.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the values of
//! the `DOC_LOG` environment variable which follows the same conventions as `RUST_LOG`. This will
//! provide console logging. For example, `DOC_LOG=document_resolver=debug` shows every resolver
//! invocation along with the store calls it makes.

use thiserror::Error;

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*, util::TryInitError};

use crate::env_const::DOC_LOG;

/// Initialize the tracing subscriber.
///
/// Creates a `tracing_subscriber::fmt` layer filtered by `DOC_LOG` (`WARN` when unset or
/// unparsable). Fails if a global subscriber has already been installed.
pub fn init() -> Result<(), TracingInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(DOC_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[derive(Error, Debug)]
pub enum TracingInitError {
    #[error("Unable to install the tracing subscriber: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}
