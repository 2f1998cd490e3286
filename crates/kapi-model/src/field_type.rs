// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{
    primitive_type::PrimitiveType,
    types::{EnumId, TypeId},
};

/// The declared type of an argument, a property or an action's return value.
#[derive(Debug, Clone)]
pub enum FieldType {
    Primitive(PrimitiveType),
    Enum { name: String, id: EnumId },
    Object { name: String, id: TypeId },
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            FieldType::Primitive(pt) => Some(*pt),
            _ => None,
        }
    }

    /// The innermost non-array type.
    pub fn innermost(&self) -> &FieldType {
        match self {
            FieldType::Array(inner) => inner.innermost(),
            _ => self,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Primitive(pt) => write!(f, "{pt}"),
            FieldType::Enum { name, .. } | FieldType::Object { name, .. } => f.write_str(name),
            FieldType::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// Inclusive bounds checked after coercion. Bounds are integers, as are coerced numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
}

impl ValueConstraints {
    pub fn is_empty(&self) -> bool {
        self == &ValueConstraints::default()
    }
}
