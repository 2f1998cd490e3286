// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Identifier and description conventions.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SchemaError;

static SERVICE_OR_ACTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]+$").unwrap());
static MEMBER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static ACCESSOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());
static ENUM_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z].+").unwrap());

pub(super) fn is_service_or_action_name(name: &str) -> bool {
    SERVICE_OR_ACTION_NAME.is_match(name)
}

/// Arguments and properties.
pub(super) fn is_member_name(name: &str) -> bool {
    MEMBER_NAME.is_match(name)
}

pub(super) fn is_accessor_name(name: &str) -> bool {
    ACCESSOR_NAME.is_match(name)
}

pub(super) fn is_enum_key(key: &str) -> bool {
    ENUM_KEY.is_match(key)
}

/// A capitalized sentence of at least two characters.
pub(super) fn is_description(text: &str) -> bool {
    DESCRIPTION.is_match(text)
}

/// Names that depend on the configured type prefix.
pub(super) struct TypeNaming {
    prefix: String,
    type_name: Regex,
}

impl TypeNaming {
    pub(super) fn new(prefix: &str) -> Result<Self, SchemaError> {
        let type_name = Regex::new(&format!("^{}[A-Z][a-zA-Z0-9]+$", regex::escape(prefix)))
            .map_err(|e| SchemaError::invalid(format!("Type prefix [{prefix}] is invalid: {e}")))?;

        Ok(Self {
            prefix: prefix.to_string(),
            type_name,
        })
    }

    pub(super) fn is_type_name(&self, name: &str) -> bool {
        self.type_name.is_match(name)
    }

    pub(super) fn prefixed(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    pub(super) fn object_root(&self) -> String {
        self.prefixed("Object")
    }

    pub(super) fn exception_root(&self) -> String {
        self.prefixed("APIException")
    }

    pub(super) fn string_enum(&self) -> String {
        self.prefixed("StringEnum")
    }

    pub(super) fn numeric_enum(&self) -> String {
        self.prefixed("NumericEnum")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_service_or_action_name("doNothing"));
        assert!(!is_service_or_action_name("d"));
        assert!(!is_service_or_action_name("DoNothing"));
        assert!(!is_service_or_action_name("doNothing_"));

        assert!(is_member_name("a"));
        assert!(!is_member_name("myArg_"));

        assert!(is_accessor_name("Int"));
        assert!(!is_accessor_name("invalid"));

        assert!(is_enum_key("VAL_1"));
        assert!(!is_enum_key("val1"));

        assert!(is_description("Do nothing"));
        assert!(!is_description("no capital letter"));
        assert!(!is_description("A"));
    }

    #[test]
    fn type_names_follow_the_prefix() {
        let kaltura = TypeNaming::new("Kaltura").unwrap();
        assert!(kaltura.is_type_name("KalturaMediaEntry"));
        assert!(!kaltura.is_type_name("kalturaTest"));
        assert!(!kaltura.is_type_name("KalturaA"));
        assert!(!kaltura.is_type_name("AcmeMediaEntry"));
        assert_eq!(kaltura.object_root(), "KalturaObject");

        let acme = TypeNaming::new("Acme").unwrap();
        assert!(acme.is_type_name("AcmeMediaEntry"));
        assert_eq!(acme.numeric_enum(), "AcmeNumericEnum");
    }
}
