// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    String,
    Number,
    /// Seconds since the Unix epoch. Coerced like `Number`.
    Time,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveType::Boolean),
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "time" => Some(PrimitiveType::Time),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Time => "time",
        }
    }

    /// Whether `minLength`/`maxLength` restrictions apply to values of this type.
    pub fn admits_length_restrictions(&self) -> bool {
        matches!(self, PrimitiveType::String)
    }

    /// Whether `minValue`/`maxValue` restrictions apply to values of this type.
    pub fn admits_value_restrictions(&self) -> bool {
        matches!(self, PrimitiveType::Number | PrimitiveType::Time)
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
