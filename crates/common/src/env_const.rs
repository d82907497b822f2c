// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use doc_env::{EnvError, Environment, get_parsed};

pub const DOC_LOG: &str = "DOC_LOG";

/// Page size applied by the in-memory store when a query carries no `limit` (unset = unbounded)
pub const DOC_STORE_DEFAULT_LIMIT: &str = "DOC_STORE_DEFAULT_LIMIT";

/// Whether the in-memory store returns only projected fields (`true`, the default) or always
/// returns complete documents.
pub const DOC_STORE_APPLY_PROJECTION: &str = "DOC_STORE_APPLY_PROJECTION";

pub fn get_store_default_limit(env: &dyn Environment) -> Result<Option<usize>, EnvError> {
    get_parsed(env, DOC_STORE_DEFAULT_LIMIT)
}

pub fn get_store_apply_projection(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(DOC_STORE_APPLY_PROJECTION, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_env::MapEnvironment;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn store_settings() {
        let env = MapEnvironment::from([
            (DOC_STORE_DEFAULT_LIMIT, "100"),
            (DOC_STORE_APPLY_PROJECTION, "off"),
        ]);

        assert_eq!(get_store_default_limit(&env).unwrap(), Some(100));
        assert!(!get_store_apply_projection(&env).unwrap());

        let empty = MapEnvironment::new();
        assert_eq!(get_store_default_limit(&empty).unwrap(), None);
        assert!(get_store_apply_projection(&empty).unwrap());
    }
}
