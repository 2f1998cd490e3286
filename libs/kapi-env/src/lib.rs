// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Process configuration as seen by the schema loader and the dispatcher.
//!
//! Everything reads configuration through the [`Environment`] trait so that tests (and embedders
//! that keep configuration elsewhere) can substitute a [`MapEnvironment`] for the real process
//! environment.

mod map;

pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// A boolean flag. Unset keys take `default_value`; unrecognized spellings are an error.
    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
                "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
                _ => Err(EnvError::InvalidBoolean {
                    key: key.to_string(),
                    value,
                }),
            },
            None => Ok(default_value),
        }
    }

    /// The value for `key`, treating an empty (or whitespace only) value as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn get_or_else(&self, key: &str, default_value: &str) -> String {
        self.get_non_empty(key)
            .unwrap_or_else(|| default_value.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
    )]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid env value {env_value} for {env_key}: {message}")]
    InvalidValue {
        env_key: &'static str,
        env_value: String,
        message: String,
    },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_spellings() {
        let env = MapEnvironment::from([("A", "Yes"), ("B", "off"), ("C", " 1 "), ("D", "maybe")]);

        assert!(env.enabled("A", false).unwrap());
        assert!(!env.enabled("B", true).unwrap());
        assert!(env.enabled("C", false).unwrap());
        assert!(matches!(
            env.enabled("D", true),
            Err(EnvError::InvalidBoolean { .. })
        ));
        assert!(env.enabled("UNSET", true).unwrap());
    }

    #[test]
    fn empty_values_fall_back_to_default() {
        let env = MapEnvironment::from([("PREFIX", "  ")]);

        assert_eq!(env.get_non_empty("PREFIX"), None);
        assert_eq!(env.get_or_else("PREFIX", "Kaltura"), "Kaltura");
    }
}
