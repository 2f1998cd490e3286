// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use kapi_model::types::{EnumDef, EnumKind};

use crate::{
    declaration::{DeclarationKind, DeclarationRecord, DeclarationSource},
    error::SchemaError,
};

use super::{
    naming::{TypeNaming, is_description, is_enum_key},
    system_builder::SystemContextBuilding,
};

pub(super) fn build(
    sources: &[&DeclarationSource],
    naming: &TypeNaming,
    building: &mut SystemContextBuilding,
) -> Result<(), SchemaError> {
    for source in sources {
        for record in source.records_of(DeclarationKind::Enum) {
            let enum_def = build_enum(source, record, naming)?;
            let name = enum_def.name.clone();

            if building.types.contains_key(&name)
                || building.enums.try_add(&name, enum_def).is_err()
            {
                return Err(SchemaError::invalid(format!(
                    "Enum [{name}] appears more than once"
                )));
            }
            debug!("Registered enum {name}");
        }
    }
    Ok(())
}

fn build_enum(
    source: &DeclarationSource,
    record: &DeclarationRecord,
    naming: &TypeNaming,
) -> Result<EnumDef, SchemaError> {
    let name = &record.qualified_name;

    let kind = match record.extends.as_deref() {
        Some(base) if base == naming.string_enum() => EnumKind::String,
        Some(base) if base == naming.numeric_enum() => EnumKind::Numeric,
        _ => {
            return Err(SchemaError::invalid(format!(
                "Enum [{name}] must extend from {} or {}",
                naming.string_enum(),
                naming.numeric_enum()
            )));
        }
    };

    let values = record.values.clone().unwrap_or_default();
    for value in values.values() {
        match kind {
            EnumKind::String if !value.is_string() => {
                return Err(SchemaError::invalid(format!(
                    "Enum value [{}] must be string",
                    literal_display(value)
                )));
            }
            EnumKind::Numeric if !value.is_number() => {
                return Err(SchemaError::invalid(format!(
                    "Enum value [{}] must be numeric",
                    literal_display(value)
                )));
            }
            _ => {}
        }
    }

    if !naming.is_type_name(name) {
        return Err(SchemaError::invalid(format!("Enum [{name}] name is invalid")));
    }

    if !source.exports_name(name) {
        return Err(SchemaError::invalid(format!(
            "Enum [{name}] must be exported in its module"
        )));
    }

    let description = match record.description.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(SchemaError::invalid(format!(
                "Enum [{name}] description not defined"
            )));
        }
        Some(description) if !is_description(description) => {
            return Err(SchemaError::invalid(format!(
                "Enum [{name}] description [{description}] is invalid"
            )));
        }
        Some(description) => description.to_string(),
    };

    if let Some(key) = values.keys().find(|key| !is_enum_key(key)) {
        return Err(SchemaError::invalid(format!(
            "Enum [{name}] key [{key}] is invalid"
        )));
    }

    Ok(EnumDef {
        name: name.clone(),
        description,
        kind,
        values,
    })
}

/// A literal as written, without JSON quoting.
fn literal_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
