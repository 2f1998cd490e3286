// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Object types: the inheritance graph first (every type registered with its base resolved), then
//! each type's properties, which may refer to any registered type or enum.

use indexmap::IndexMap;
use tracing::debug;

use kapi_model::{
    field_type::FieldType,
    mapped_arena::MappedArena,
    primitive_type::PrimitiveType,
    types::{EnumKind, PropertySpec, TypeDef, TypeId},
};

use crate::{
    declaration::{DeclarationKind, DeclarationRecord, DeclarationSource, TagValue},
    error::SchemaError,
};

use super::{
    naming::{TypeNaming, is_accessor_name, is_description, is_member_name},
    restrictions::{inapplicable_restrictions, parse_constraints},
    system_builder::SystemContextBuilding,
    type_expr::resolve_type,
};

type Declarations<'a> = IndexMap<&'a str, (&'a DeclarationSource, &'a DeclarationRecord)>;

/// Add a type and make it a child of each of its ancestors.
pub(super) fn register_type(
    types: &mut MappedArena<TypeDef>,
    typ: TypeDef,
) -> Result<TypeId, SchemaError> {
    let name = typ.name.clone();
    let base = typ.base;

    let id = types
        .try_add(&name, typ)
        .map_err(|_| SchemaError::invalid(format!("Type [{name}] appears more than once")))?;

    let mut ancestor = base;
    while let Some(ancestor_id) = ancestor {
        types[ancestor_id].children.push(id);
        ancestor = types[ancestor_id].base;
    }

    Ok(id)
}

pub(super) fn build(
    sources: &[&DeclarationSource],
    naming: &TypeNaming,
    building: &mut SystemContextBuilding,
) -> Result<(), SchemaError> {
    let declarations = collect_declarations(sources, naming, building)?;

    let mut visiting = vec![];
    for name in declarations.keys() {
        register_declared(name, &declarations, naming, building, &mut visiting)?;
    }

    for (name, (source, record)) in &declarations {
        let id = building
            .types
            .get_id(name)
            .ok_or_else(|| SchemaError::invalid(format!("Type [{name}] is not registered")))?;

        let mut properties: Vec<PropertySpec> = vec![];
        for property_record in source
            .records_owned_by(&record.qualified_name)
            .filter(|r| r.kind == DeclarationKind::Property)
        {
            let property = build_property(name, property_record, building)?;
            if properties.iter().any(|p| p.name == property.name) {
                return Err(SchemaError::invalid(format!(
                    "Type [{name}] property [{}] appears more than once",
                    property.name
                )));
            }
            properties.push(property);
        }

        building.types[id].properties = properties;
    }

    for source in sources {
        for property_record in source.records_of(DeclarationKind::Property) {
            let owner = property_record.owner_qualified_name.as_deref();
            let declared_here = owner
                .and_then(|owner| declarations.get(owner))
                .is_some_and(|(owner_source, _)| owner_source.name == source.name);

            if !declared_here {
                return Err(SchemaError::invalid(format!(
                    "Property [{}] belongs to unknown type [{}]",
                    property_record.qualified_name,
                    owner.unwrap_or_default()
                )));
            }
        }
    }

    Ok(())
}

fn collect_declarations<'a>(
    sources: &[&'a DeclarationSource],
    naming: &TypeNaming,
    building: &SystemContextBuilding,
) -> Result<Declarations<'a>, SchemaError> {
    let roots = [naming.object_root(), naming.exception_root()];
    let mut declarations = Declarations::new();

    for source in sources {
        for record in source.records_of(DeclarationKind::Type) {
            let name = record.qualified_name.as_str();
            if roots.iter().any(|root| root == name) {
                continue;
            }

            if building.types.contains_key(name)
                || building.enums.contains_key(name)
                || declarations.insert(name, (*source, record)).is_some()
            {
                return Err(SchemaError::invalid(format!(
                    "Type [{name}] appears more than once"
                )));
            }
        }
    }

    Ok(declarations)
}

/// Register a declared type after its base, depth first.
fn register_declared(
    name: &str,
    declarations: &Declarations,
    naming: &TypeNaming,
    building: &mut SystemContextBuilding,
    visiting: &mut Vec<String>,
) -> Result<TypeId, SchemaError> {
    if let Some(id) = building.types.get_id(name) {
        return Ok(id);
    }
    if visiting.iter().any(|v| v == name) {
        return Err(SchemaError::invalid(format!(
            "Type [{name}] inheritance cycle detected"
        )));
    }

    let Some((source, record)) = declarations.get(name) else {
        return Err(SchemaError::invalid(format!("Type [{name}] is not declared")));
    };

    if !naming.is_type_name(name) {
        return Err(SchemaError::invalid(format!("Type [{name}] name is invalid")));
    }

    if !source.exports_name(name) {
        return Err(SchemaError::invalid(format!(
            "Type [{name}] must be exported in its module"
        )));
    }

    let object_root = naming.object_root();
    let base = match record.extends.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(SchemaError::invalid(format!(
                "Type [{name}] should extend from {object_root}"
            )));
        }
        Some(base) if declarations.contains_key(base) => {
            visiting.push(name.to_string());
            let base_id = register_declared(base, declarations, naming, building, visiting)?;
            visiting.pop();
            base_id
        }
        Some(base) => building.types.get_id(base).ok_or_else(|| {
            SchemaError::invalid(format!(
                "Type [{name}] base class [{base}] is not known as {object_root}"
            ))
        })?,
    };

    let description = match record.description.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(SchemaError::invalid(format!(
                "Type [{name}] description not defined"
            )));
        }
        Some(description) if !is_description(description) => {
            return Err(SchemaError::invalid(format!(
                "Type [{name}] description [{description}] is invalid"
            )));
        }
        Some(description) => description.to_string(),
    };

    let id = register_type(
        &mut building.types,
        TypeDef {
            name: name.to_string(),
            description,
            is_abstract: record.has_flag("abstract"),
            base: Some(base),
            properties: vec![],
            children: vec![],
        },
    )?;

    debug!(
        "Registered type {name} extending {}",
        building.types[base].name
    );

    Ok(id)
}

fn build_property(
    type_name: &str,
    record: &DeclarationRecord,
    building: &SystemContextBuilding,
) -> Result<PropertySpec, SchemaError> {
    let accessor = record.simple_name();
    let name = record.tag_text("property").unwrap_or_default();

    let fail = |message: &str| {
        Err(SchemaError::invalid(format!(
            "Type [{type_name}] property [{name}] {message}"
        )))
    };

    if !is_member_name(&name) {
        let shown = if name.is_empty() { accessor } else { &name };
        return Err(SchemaError::invalid(format!(
            "Type [{type_name}] property [{shown}] name is invalid"
        )));
    }
    if !is_accessor_name(accessor) {
        return fail("method name is invalid");
    }

    let description = match record.description.as_deref().map(str::trim) {
        None | Some("") => return fail("description not defined"),
        Some(description) if !is_description(description) => {
            return fail("description is invalid");
        }
        Some(description) => description.to_string(),
    };

    let Some(declared) = record.tag_text("type") else {
        return fail("type not defined");
    };
    let Some(typ) = resolve_type(&declared, building) else {
        return fail(&format!("invalid type [{declared}]"));
    };

    let constraints = match parse_constraints(&record.tags) {
        Ok(constraints) => constraints,
        Err(key) => return fail(&format!("{key} is not a number")),
    };

    let inapplicable = inapplicable_restrictions(&record.tags, &typ);
    if !inapplicable.is_empty() {
        return Err(SchemaError::invalid(format!(
            "Type [{type_name}] {declared} property [{name}] invalid restrictions [{}]",
            inapplicable.join(", ")
        )));
    }

    let default = match record.tags.get("default") {
        None => None,
        Some(value) => match normalize_default(value, &typ, building) {
            Some(default) => Some(default),
            None => return fail(&format!("default [{value}] is invalid")),
        },
    };

    Ok(PropertySpec {
        name: name.clone(),
        accessor: Some(accessor.to_string()),
        description,
        typ,
        constraints,
        default,
    })
}

/// The `default` tag as a value of the property's type. Only primitives and enums have defaults.
fn normalize_default(
    value: &TagValue,
    typ: &FieldType,
    building: &SystemContextBuilding,
) -> Option<serde_json::Value> {
    match typ {
        FieldType::Primitive(PrimitiveType::Boolean) => match value {
            TagValue::Flag(flag) => Some(serde_json::Value::Bool(*flag)),
            _ => match value.to_string().trim() {
                "true" | "1" => Some(serde_json::Value::Bool(true)),
                "false" | "0" => Some(serde_json::Value::Bool(false)),
                _ => None,
            },
        },
        FieldType::Primitive(PrimitiveType::String) => {
            Some(serde_json::Value::String(value.to_string()))
        }
        FieldType::Primitive(PrimitiveType::Number | PrimitiveType::Time) => {
            value.as_integer().map(serde_json::Value::from)
        }
        FieldType::Enum { id, .. } => {
            let enum_def = &building.enums[*id];
            let literal = match (value, enum_def.kind) {
                (TagValue::Text(key), _) if enum_def.value_of(key).is_some() => {
                    enum_def.value_of(key).cloned()
                }
                (TagValue::Text(text), EnumKind::String) => {
                    Some(serde_json::Value::String(text.clone()))
                }
                (_, EnumKind::Numeric) => value.as_integer().map(serde_json::Value::from),
                _ => None,
            }?;
            enum_def.contains_literal(&literal).then_some(literal)
        }
        FieldType::Object { .. } | FieldType::Array(_) => None,
    }
}
