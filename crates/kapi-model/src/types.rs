// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    field_type::{FieldType, ValueConstraints},
    mapped_arena::SerializableSlabIndex,
};

pub type TypeId = SerializableSlabIndex<TypeDef>;
pub type EnumId = SerializableSlabIndex<EnumDef>;

/// A registered object type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub description: String,
    pub is_abstract: bool,
    /// `None` only for the built-in roots
    pub base: Option<TypeId>,
    /// Properties declared directly on this type (inherited ones live on the ancestors)
    pub properties: Vec<PropertySpec>,
    /// Every registered descendant, direct or not, in registration order
    pub children: Vec<TypeId>,
}

impl TypeDef {
    pub fn is_instantiable(&self) -> bool {
        !self.is_abstract
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn has_descendant(&self, id: TypeId) -> bool {
        self.children.contains(&id)
    }
}

#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: String,
    /// Capitalized accessor name used by generated clients
    pub accessor: Option<String>,
    pub description: String,
    pub typ: FieldType,
    pub constraints: ValueConstraints,
    /// Value a fresh instance starts with, already normalized to the property's type
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumKind {
    String,
    Numeric,
}

/// A registered enum: an ordered set of `KEY -> literal` pairs.
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub description: String,
    pub kind: EnumKind,
    pub values: IndexMap<String, serde_json::Value>,
}

impl EnumDef {
    /// The registered literal equal to `raw`. Numeric enums compare by numeric value
    /// (`2.0` matches `2`); string enums compare exactly.
    pub fn matching_literal(&self, raw: &serde_json::Value) -> Option<&serde_json::Value> {
        self.values
            .values()
            .find(|value| literal_eq(self.kind, value, raw))
    }

    pub fn contains_literal(&self, literal: &serde_json::Value) -> bool {
        self.matching_literal(literal).is_some()
    }

    pub fn value_of(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn key_of(&self, literal: &serde_json::Value) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, value)| literal_eq(self.kind, value, literal))
            .map(|(key, _)| key.as_str())
    }
}

fn literal_eq(kind: EnumKind, registered: &serde_json::Value, raw: &serde_json::Value) -> bool {
    match (kind, registered, raw) {
        (EnumKind::Numeric, serde_json::Value::Number(a), serde_json::Value::Number(b)) => {
            match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            }
        }
        _ => registered == raw,
    }
}
