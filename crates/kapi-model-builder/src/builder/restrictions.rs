// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! `minValue`/`maxValue`/`minLength`/`maxLength` tags on arguments and properties.

use indexmap::IndexMap;
use kapi_model::field_type::{FieldType, ValueConstraints};

use crate::declaration::TagValue;

/// Read the bound tags. Every `min*`/`max*` tag must be numeric; the first one that is not is
/// returned as the error.
pub(super) fn parse_constraints(
    tags: &IndexMap<String, TagValue>,
) -> Result<ValueConstraints, &str> {
    let mut constraints = ValueConstraints::default();

    for (key, value) in tags {
        if !(key.starts_with("min") || key.starts_with("max")) {
            continue;
        }
        let bound = value.as_integer().ok_or(key.as_str())?;

        match key.as_str() {
            "minValue" => constraints.min_value = Some(bound),
            "maxValue" => constraints.max_value = Some(bound),
            "minLength" => constraints.min_length = Some(bound),
            "maxLength" => constraints.max_length = Some(bound),
            _ => {}
        }
    }

    Ok(constraints)
}

/// Restriction tags that make no sense for the declared type, in tag order.
pub(super) fn inapplicable_restrictions<'a>(
    tags: &'a IndexMap<String, TagValue>,
    typ: &FieldType,
) -> Vec<&'a str> {
    let primitive = typ.primitive();

    tags.keys()
        .map(String::as_str)
        .filter(|key| {
            if key.ends_with("Value") {
                !primitive.is_some_and(|p| p.admits_value_restrictions())
            } else if key.ends_with("Length") {
                !primitive.is_some_and(|p| p.admits_length_restrictions())
            } else {
                false
            }
        })
        .collect()
}
