// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Declaration sources: the explicit form of documented handlers and value objects.
//!
//! A source corresponds to one annotated module. Its records describe the module itself (a
//! `service` when tagged so), its callables (`action`s), the object types and enums it declares,
//! and the properties of those types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationSource {
    pub name: String,
    #[serde(default)]
    pub requires: Vec<Requirement>,
    /// Qualified names reachable from the source's exported surface
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub records: Vec<DeclarationRecord>,
}

impl DeclarationSource {
    pub fn exports_name(&self, qualified_name: &str) -> bool {
        self.exports.iter().any(|export| export == qualified_name)
    }

    pub fn records_of(&self, kind: DeclarationKind) -> impl Iterator<Item = &DeclarationRecord> {
        self.records.iter().filter(move |record| record.kind == kind)
    }

    pub fn records_owned_by<'a>(
        &'a self,
        owner: &'a str,
    ) -> impl Iterator<Item = &'a DeclarationRecord> {
        self.records
            .iter()
            .filter(move |record| record.owner_qualified_name.as_deref() == Some(owner))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub source: String,
    /// Register the required source's types before this source's
    #[serde(default)]
    pub scan_types: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Module,
    Type,
    Property,
    Callable,
    Enum,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: IndexMap<String, TagValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<IndexMap<String, serde_json::Value>>,
    #[serde(default)]
    pub params: Vec<ParamDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_artifact: Option<String>,
}

impl DeclarationRecord {
    /// The last segment of the qualified name (`Int` for `KalturaTest.Int`).
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn tag_text(&self, name: &str) -> Option<String> {
        self.tags.get(name).and_then(TagValue::text)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.tags.get(name).is_some_and(TagValue::is_set)
    }

    /// The key the action's handler is registered under.
    pub fn handler_key(&self) -> &str {
        self.bound_artifact.as_deref().unwrap_or(&self.qualified_name)
    }

    /// `file:line` when the source location is known, for diagnostics.
    pub fn location(&self) -> Option<String> {
        self.source_location
            .as_ref()
            .map(|location| format!("{}:{}", location.file, location.line))
    }
}

/// A documented callable argument (`@param {type} name Description @minValue 3`).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ParamDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: IndexMap<String, TagValue>,
}

impl ParamDoc {
    pub fn has_flag(&self, name: &str) -> bool {
        self.tags.get(name).is_some_and(TagValue::is_set)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl TagValue {
    pub fn text(&self) -> Option<String> {
        match self {
            TagValue::Text(text) => Some(text.clone()),
            TagValue::Number(number) => Some(number.to_string()),
            TagValue::Flag(_) => None,
        }
    }

    /// Whether a flag-style tag (`@abstract`, `@optional true`) is switched on.
    pub fn is_set(&self) -> bool {
        match self {
            TagValue::Flag(flag) => *flag,
            TagValue::Text(text) => text.trim() == "true",
            TagValue::Number(_) => false,
        }
    }

    /// The tag as a finite number, truncated toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        let value = match self {
            TagValue::Number(number) => number.as_f64(),
            TagValue::Text(text) => text.trim().parse::<f64>().ok(),
            TagValue::Flag(_) => None,
        }?;

        (value.is_finite() && value.abs() < i64::MAX as f64).then(|| value.trunc() as i64)
    }
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValue::Flag(flag) => write!(f, "{flag}"),
            TagValue::Number(number) => write!(f, "{number}"),
            TagValue::Text(text) => f.write_str(text),
        }
    }
}
