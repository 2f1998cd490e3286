// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A serializable description of a compiled [`ApiSystem`], for documentation and client
//! generators.

use serde::Serialize;

use crate::{
    field_type::{FieldType, ValueConstraints},
    system::ApiSystem,
    types::EnumKind,
};

#[derive(Serialize, Debug)]
pub struct SchemaDocument {
    pub services: Vec<ServiceDocument>,
    pub types: Vec<TypeDocument>,
    pub enums: Vec<EnumDocument>,
}

#[derive(Serialize, Debug)]
pub struct ServiceDocument {
    pub name: String,
    pub description: String,
    pub actions: Vec<ActionDocument>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActionDocument {
    pub name: String,
    pub description: String,
    pub arguments: Vec<ArgumentDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    pub handler: String,
}

#[derive(Serialize, Debug)]
pub struct ArgumentDocument {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "ValueConstraints::is_empty")]
    pub constraints: ValueConstraints,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TypeDocument {
    pub name: String,
    pub description: String,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    pub properties: Vec<PropertyDocument>,
}

#[derive(Serialize, Debug)]
pub struct PropertyDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessor: Option<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(skip_serializing_if = "ValueConstraints::is_empty")]
    pub constraints: ValueConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Serialize, Debug)]
pub struct EnumDocument {
    pub name: String,
    pub description: String,
    pub kind: EnumKind,
    pub values: indexmap::IndexMap<String, serde_json::Value>,
}

impl SchemaDocument {
    pub fn new(system: &ApiSystem) -> Self {
        let services = system
            .services
            .iter()
            .map(|(_, service)| ServiceDocument {
                name: service.name.clone(),
                description: service.description.clone(),
                actions: service
                    .actions
                    .values()
                    .map(|action| ActionDocument {
                        name: action.name.clone(),
                        description: action.description.clone(),
                        arguments: action
                            .arguments
                            .iter()
                            .map(|argument| ArgumentDocument {
                                name: argument.name.clone(),
                                description: argument.description.clone(),
                                typ: type_name(&argument.typ),
                                optional: argument.optional,
                                constraints: argument.constraints.clone(),
                            })
                            .collect(),
                        returns: action.return_type.as_ref().map(type_name),
                        handler: action.handler.key.clone(),
                    })
                    .collect(),
            })
            .collect();

        let types = system
            .types
            .iter()
            .map(|(_, typ)| TypeDocument {
                name: typ.name.clone(),
                description: typ.description.clone(),
                is_abstract: typ.is_abstract,
                base: typ.base.map(|base| system.types[base].name.clone()),
                properties: typ
                    .properties
                    .iter()
                    .map(|property| PropertyDocument {
                        name: property.name.clone(),
                        accessor: property.accessor.clone(),
                        description: property.description.clone(),
                        typ: type_name(&property.typ),
                        constraints: property.constraints.clone(),
                        default: property.default.clone(),
                    })
                    .collect(),
            })
            .collect();

        let enums = system
            .enums
            .iter()
            .map(|(_, enum_def)| EnumDocument {
                name: enum_def.name.clone(),
                description: enum_def.description.clone(),
                kind: enum_def.kind,
                values: enum_def.values.clone(),
            })
            .collect();

        Self {
            services,
            types,
            enums,
        }
    }
}

fn type_name(typ: &FieldType) -> String {
    typ.to_string()
}
