// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Declared type expressions: a primitive, a registered enum or object type, or an array of one
//! of those (`array<T>`, `Array.<T>`, `Array<T>`, `T[]`).

use kapi_model::{field_type::FieldType, primitive_type::PrimitiveType};

use super::system_builder::SystemContextBuilding;

pub(super) fn resolve_type(declared: &str, building: &SystemContextBuilding) -> Option<FieldType> {
    let declared = declared.trim();

    match array_element(declared) {
        Some(element) => resolve_named(element, building).map(|t| FieldType::Array(Box::new(t))),
        None => resolve_named(declared, building),
    }
}

fn array_element(declared: &str) -> Option<&str> {
    if let Some(element) = declared.strip_suffix("[]") {
        return Some(element.trim());
    }

    ["array<", "Array<", "Array.<"]
        .iter()
        .find_map(|opening| declared.strip_prefix(opening))
        .and_then(|rest| rest.strip_suffix('>'))
        .map(str::trim)
}

fn resolve_named(name: &str, building: &SystemContextBuilding) -> Option<FieldType> {
    if let Some(primitive) = PrimitiveType::from_name(name) {
        return Some(FieldType::Primitive(primitive));
    }

    if let Some(id) = building.enums.get_id(name) {
        return Some(FieldType::Enum {
            name: name.to_string(),
            id,
        });
    }

    building.types.get_id(name).map(|id| FieldType::Object {
        name: name.to_string(),
        id,
    })
}
