// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Types every registry starts with.

use kapi_model::{
    field_type::{FieldType, ValueConstraints},
    mapped_arena::MappedArena,
    primitive_type::PrimitiveType,
    types::{PropertySpec, TypeDef, TypeId},
};

use crate::error::SchemaError;

use super::{naming::TypeNaming, type_builder::register_type};

/// Register the built-in types, returning the object root.
pub(super) fn build(
    naming: &TypeNaming,
    types: &mut MappedArena<TypeDef>,
) -> Result<TypeId, SchemaError> {
    let root = register_type(
        types,
        builtin(&naming.object_root(), "Base object", true, None, vec![]),
    )?;

    register_type(
        types,
        builtin(
            &naming.exception_root(),
            "Base API exception",
            true,
            Some(root),
            vec![
                primitive_property("code", "Code", "Error code", PrimitiveType::String),
                primitive_property("message", "Message", "Error message", PrimitiveType::String),
            ],
        ),
    )?;

    register_type(
        types,
        builtin(&naming.prefixed("Filter"), "Base filter", false, Some(root), vec![]),
    )?;

    let mut page_size = primitive_property(
        "pageSize",
        "PageSize",
        "The number of objects to retrieve",
        PrimitiveType::Number,
    );
    page_size.default = Some(serde_json::Value::from(25));

    register_type(
        types,
        builtin(
            &naming.prefixed("FilterPager"),
            "Pager for list actions",
            false,
            Some(root),
            vec![
                page_size,
                primitive_property(
                    "pageIndex",
                    "PageIndex",
                    "The page number for which page of objects should be retrieved",
                    PrimitiveType::Number,
                ),
            ],
        ),
    )?;

    register_type(
        types,
        builtin(
            &naming.prefixed("ListResponse"),
            "Base list response",
            false,
            Some(root),
            vec![primitive_property(
                "totalCount",
                "TotalCount",
                "Total number of objects",
                PrimitiveType::Number,
            )],
        ),
    )?;

    Ok(root)
}

fn builtin(
    name: &str,
    description: &str,
    is_abstract: bool,
    base: Option<TypeId>,
    properties: Vec<PropertySpec>,
) -> TypeDef {
    TypeDef {
        name: name.to_string(),
        description: description.to_string(),
        is_abstract,
        base,
        properties,
        children: vec![],
    }
}

fn primitive_property(
    name: &str,
    accessor: &str,
    description: &str,
    primitive: PrimitiveType,
) -> PropertySpec {
    PropertySpec {
        name: name.to_string(),
        accessor: Some(accessor.to_string()),
        description: description.to_string(),
        typ: FieldType::Primitive(primitive),
        constraints: ValueConstraints::default(),
        default: None,
    }
}
