// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use kapi_env::{EnvError, Environment};

pub const KAPI_LOG: &str = "KAPI_LOG";

pub const KAPI_TYPE_PREFIX: &str = "KAPI_TYPE_PREFIX";
pub const KAPI_SESSION_FIELD: &str = "KAPI_SESSION_FIELD";
pub const KAPI_ENFORCE_SESSION_EXPIRY: &str = "KAPI_ENFORCE_SESSION_EXPIRY";

pub const DEFAULT_TYPE_PREFIX: &str = "Kaltura";
pub const DEFAULT_SESSION_FIELD: &str = "ks";

/// The prefix every declared type and enum name must carry (`Kaltura` unless overridden).
pub fn get_type_prefix(env: &dyn Environment) -> Result<String, EnvError> {
    let prefix = env.get_or_else(KAPI_TYPE_PREFIX, DEFAULT_TYPE_PREFIX);

    let mut chars = prefix.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric());

    if well_formed {
        Ok(prefix)
    } else {
        Err(EnvError::InvalidValue {
            env_key: KAPI_TYPE_PREFIX,
            env_value: prefix,
            message: "Must start with an uppercase letter followed by letters or digits"
                .to_string(),
        })
    }
}

/// The payload field that carries the session token.
pub fn get_session_field(env: &dyn Environment) -> String {
    env.get_or_else(KAPI_SESSION_FIELD, DEFAULT_SESSION_FIELD)
}

pub fn get_enforce_session_expiry(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(KAPI_ENFORCE_SESSION_EXPIRY, true)
}

#[cfg(test)]
mod tests {
    use kapi_env::MapEnvironment;

    use super::*;

    #[test]
    fn defaults() {
        let env = MapEnvironment::new();

        assert_eq!(get_type_prefix(&env).unwrap(), "Kaltura");
        assert_eq!(get_session_field(&env), "ks");
        assert!(get_enforce_session_expiry(&env).unwrap());
    }

    #[test]
    fn overrides() {
        let env = MapEnvironment::from([
            (KAPI_TYPE_PREFIX, "Acme"),
            (KAPI_SESSION_FIELD, "token"),
            (KAPI_ENFORCE_SESSION_EXPIRY, "false"),
        ]);

        assert_eq!(get_type_prefix(&env).unwrap(), "Acme");
        assert_eq!(get_session_field(&env), "token");
        assert!(!get_enforce_session_expiry(&env).unwrap());
    }

    #[test]
    fn malformed_prefix() {
        let env = MapEnvironment::from([(KAPI_TYPE_PREFIX, "acme-")]);

        insta::assert_snapshot!(
            get_type_prefix(&env).unwrap_err(),
            @"Invalid env value acme- for KAPI_TYPE_PREFIX: Must start with an uppercase letter followed by letters or digits"
        );
    }
}
