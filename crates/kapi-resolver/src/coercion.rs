// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turns raw request values into typed [`Val`]s, checking them against their declared type and
//! restrictions on the way.
//!
//! Numbers and times accept JSON numbers and numeric strings, truncated toward zero. Strings
//! accept anything, stringified. Objects honor an `objectType` discriminant naming a registered
//! subtype of the declared type.

use serde_json::{Number, Value};
use tracing::debug;

use common::value::{OBJECT_TYPE_FIELD, ObjectInstance, Val};
use kapi_model::{
    field_type::{FieldType, ValueConstraints},
    primitive_type::PrimitiveType,
    system::ApiSystem,
    types::{EnumId, TypeId},
};

use crate::error::RequestError;

pub struct ValueCoercer<'a> {
    system: &'a ApiSystem,
}

impl<'a> ValueCoercer<'a> {
    pub fn new(system: &'a ApiSystem) -> Self {
        Self { system }
    }

    /// Coerce a non-null raw value. `argument` names the value in error reports (the argument
    /// name at top level, the property name inside objects).
    pub fn coerce(
        &self,
        argument: &str,
        typ: &FieldType,
        constraints: &ValueConstraints,
        raw: &Value,
    ) -> Result<Val, RequestError> {
        match typ {
            FieldType::Primitive(PrimitiveType::Number | PrimitiveType::Time) => {
                coerce_number(argument, constraints, raw)
            }
            FieldType::Primitive(PrimitiveType::String) => {
                coerce_string(argument, constraints, raw)
            }
            FieldType::Primitive(PrimitiveType::Boolean) => coerce_boolean(argument, raw),
            FieldType::Enum { id, .. } => self.coerce_enum(argument, *id, raw),
            FieldType::Object { id, .. } => self.coerce_object(argument, *id, raw),
            FieldType::Array(element) => match raw {
                Value::Array(items) => items
                    .iter()
                    .map(|item| self.coerce(argument, element, constraints, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Val::List),
                _ => Err(RequestError::MustBeArray(argument.to_string())),
            },
        }
    }

    fn coerce_enum(&self, argument: &str, id: EnumId, raw: &Value) -> Result<Val, RequestError> {
        let enum_def = &self.system.enums[id];
        enum_def
            .matching_literal(raw)
            .map(|literal| Val::from(literal.clone()))
            .ok_or_else(|| RequestError::InvalidEnumValue {
                argument: argument.to_string(),
                enum_name: enum_def.name.clone(),
            })
    }

    fn coerce_object(
        &self,
        argument: &str,
        declared: TypeId,
        raw: &Value,
    ) -> Result<Val, RequestError> {
        let declared_type = &self.system.types[declared];

        let Value::Object(fields) = raw else {
            return Err(RequestError::MustBeObject {
                argument: argument.to_string(),
                type_name: declared_type.name.clone(),
            });
        };

        let working = match fields.get(OBJECT_TYPE_FIELD) {
            None | Some(Value::Null) => declared,
            Some(Value::String(name)) if *name == declared_type.name => declared,
            Some(Value::String(name)) => self
                .system
                .descendant_named(declared, name)
                .ok_or_else(|| RequestError::ObjectTypeNotSupported {
                    argument: argument.to_string(),
                    object_type: name.clone(),
                })?,
            Some(other) => {
                return Err(RequestError::ObjectTypeNotSupported {
                    argument: argument.to_string(),
                    object_type: other.to_string(),
                });
            }
        };

        let working_type = &self.system.types[working];
        if working_type.is_abstract {
            return Err(RequestError::AbstractParameter(working_type.name.clone()));
        }

        if working != declared {
            debug!("Argument [{argument}] dispatched to [{}]", working_type.name);
        }

        // Supplied fields override defaults; anything undeclared is dropped
        let mut instance = ObjectInstance::new(&working_type.name);
        for property in self.system.effective_properties(working) {
            let value = match fields.get(&property.name) {
                None | Some(Value::Null) => property.default.clone().map(Val::from),
                Some(value) => Some(self.coerce(
                    &property.name,
                    &property.typ,
                    &property.constraints,
                    value,
                )?),
            };
            if let Some(value) = value {
                instance.set(&property.name, value);
            }
        }

        Ok(Val::Object(instance))
    }
}

fn coerce_number(
    argument: &str,
    constraints: &ValueConstraints,
    raw: &Value,
) -> Result<Val, RequestError> {
    let value =
        parse_integer(raw).ok_or_else(|| RequestError::MustBeNumeric(argument.to_string()))?;

    if let Some(bound) = constraints.min_value.filter(|bound| value < *bound) {
        return Err(RequestError::MinValueCrossed {
            argument: argument.to_string(),
            bound,
        });
    }
    if let Some(bound) = constraints.max_value.filter(|bound| value > *bound) {
        return Err(RequestError::MaxValueCrossed {
            argument: argument.to_string(),
            bound,
        });
    }

    Ok(Val::Number(Number::from(value)))
}

/// A JSON number or numeric string, truncated toward zero. `None` for anything non-finite or
/// outside the i64 range.
fn parse_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().and_then(|n| i64::try_from(n).ok()))
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    // i64::MAX rounds up to 2^63 as an f64, hence the strict upper bound
    (truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
        .then_some(truncated as i64)
}

fn coerce_string(
    argument: &str,
    constraints: &ValueConstraints,
    raw: &Value,
) -> Result<Val, RequestError> {
    let value = match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    let length = value.chars().count() as i64;
    if let Some(bound) = constraints.min_length.filter(|bound| length < *bound) {
        return Err(RequestError::MinLengthCrossed {
            argument: argument.to_string(),
            bound,
        });
    }
    if let Some(bound) = constraints.max_length.filter(|bound| length > *bound) {
        return Err(RequestError::MaxLengthCrossed {
            argument: argument.to_string(),
            bound,
        });
    }

    Ok(Val::String(value))
}

fn coerce_boolean(argument: &str, raw: &Value) -> Result<Val, RequestError> {
    let value = match raw {
        Value::Bool(value) => Some(*value),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Some(true),
            Some(n) if n == 0.0 => Some(false),
            _ => None,
        },
        Value::String(text) => match text.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    value
        .map(Val::Bool)
        .ok_or_else(|| RequestError::MustBeBoolean(argument.to_string()))
}
