// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Services and their actions: argument binding against the handler's formal parameters,
//! argument validation and return types.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use kapi_model::{
    handler::{HandlerRef, HandlerRegistry},
    service::{ActionDef, ArgumentSpec, ServiceDef},
};

use crate::{
    declaration::{DeclarationKind, DeclarationRecord, DeclarationSource, ParamDoc},
    error::SchemaError,
};

use super::{
    naming::{is_description, is_member_name, is_service_or_action_name},
    restrictions::{inapplicable_restrictions, parse_constraints},
    system_builder::SystemContextBuilding,
    type_expr::resolve_type,
};

pub(super) fn build(
    sources: &[&DeclarationSource],
    handlers: &HandlerRegistry,
    building: &mut SystemContextBuilding,
) -> Result<(), SchemaError> {
    for source in sources {
        for module in source
            .records_of(DeclarationKind::Module)
            .filter(|record| record.tags.contains_key("service"))
        {
            let service = build_service(source, module, handlers, building)?;
            let name = service.name.clone();

            building.services.try_add(&name, service).map_err(|_| {
                SchemaError::invalid(format!("Service [{name}] appears more than once"))
            })?;
            debug!("Registered service {name}");
        }
    }
    Ok(())
}

fn build_service(
    source: &DeclarationSource,
    module: &DeclarationRecord,
    handlers: &HandlerRegistry,
    building: &SystemContextBuilding,
) -> Result<ServiceDef, SchemaError> {
    let name = module.tag_text("service").unwrap_or_default();

    if !is_service_or_action_name(&name) {
        return Err(SchemaError::invalid(format!(
            "Service [{name}] service name is invalid"
        )));
    }

    let description = match module.description.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(SchemaError::invalid(format!(
                "Service [{name}] service description not specified"
            )));
        }
        Some(description) if !is_description(description) => {
            return Err(SchemaError::invalid(format!(
                "Service [{name}] service description format is invalid"
            )));
        }
        Some(description) => description.to_string(),
    };

    let mut actions = IndexMap::new();
    for record in source
        .records_owned_by(&module.qualified_name)
        .filter(|record| record.tags.contains_key("action"))
    {
        let action_name = record.tag_text("action").unwrap_or_default();
        let label = format!("{name}.{action_name}");

        if record.kind != DeclarationKind::Callable {
            return Err(SchemaError::invalid(format!(
                "Action [{label}] is not a function"
            )));
        }
        if actions.contains_key(&action_name) {
            return Err(SchemaError::invalid(format!(
                "Action [{label}] appears more than once"
            )));
        }

        let action = build_action(&label, &action_name, record, handlers, building)?;
        actions.insert(action_name, action);
    }

    if actions.is_empty() {
        return Err(SchemaError::invalid(format!(
            "Service [{name}] no actions defined"
        )));
    }

    Ok(ServiceDef {
        name,
        description,
        actions,
    })
}

fn build_action(
    label: &str,
    name: &str,
    record: &DeclarationRecord,
    handlers: &HandlerRegistry,
    building: &SystemContextBuilding,
) -> Result<ActionDef, SchemaError> {
    let fail = |message: String| SchemaError::invalid(format!("Action [{label}] {message}"));

    if !is_service_or_action_name(name) {
        return Err(fail("action name is invalid".to_string()));
    }

    let description = match record.description.as_deref().map(str::trim) {
        None | Some("") => return Err(fail("description not specified".to_string())),
        Some(description) if !is_description(description) => {
            return Err(fail(format!("invalid description [{description}]")));
        }
        Some(description) => description.to_string(),
    };

    let handler_key = record.handler_key().to_string();
    let bound = handlers.get(&handler_key);
    if bound.is_none() {
        debug!(
            location = record.location(),
            "Action [{label}] has no handler registered under [{handler_key}]"
        );
    }

    let formal_parameters = bound
        .as_ref()
        .map(|handler| handler.parameters().to_vec())
        .or_else(|| record.parameters.clone());

    let arguments = bind_arguments(label, &record.params, formal_parameters, building)?;

    let return_type = match record.returns.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(declared) => match resolve_type(declared, building) {
            Some(typ) => Some(typ),
            None => return Err(fail(format!("invalid return type [{declared}]"))),
        },
    };

    Ok(ActionDef {
        name: name.to_string(),
        description,
        arguments,
        return_type,
        handler: HandlerRef {
            key: handler_key,
            bound,
        },
    })
}

/// Match each documented argument to a formal parameter, validate it and order the result by
/// parameter position.
fn bind_arguments(
    label: &str,
    params: &[ParamDoc],
    formal_parameters: Option<Vec<String>>,
    building: &SystemContextBuilding,
) -> Result<Vec<ArgumentSpec>, SchemaError> {
    let fail = |message: String| SchemaError::invalid(format!("Action [{label}] {message}"));

    let formal_parameters = match formal_parameters {
        Some(formal_parameters) => formal_parameters,
        None if params.is_empty() => vec![],
        None => return Err(fail("failed to parse argument names".to_string())),
    };

    if !formal_parameters.is_empty() && params.is_empty() {
        return Err(fail("arguments not described".to_string()));
    }

    struct Bound<'a> {
        position: usize,
        name: &'a str,
        declared: &'a str,
        description: &'a str,
        doc: &'a ParamDoc,
    }

    let mut documented: HashSet<&str> = HashSet::new();
    let mut bound_params = vec![];

    for (index, doc) in params.iter().enumerate() {
        let Some(name) = doc.name.as_deref().filter(|name| !name.is_empty()) else {
            return Err(fail(format!("argument [{index}] name not specified")));
        };
        let Some(position) = formal_parameters.iter().position(|p| p == name) else {
            return Err(fail(format!("argument [{name}] does not exist")));
        };
        if !documented.insert(name) {
            return Err(fail(format!("argument [{name}] appears more than once")));
        }
        let Some(declared) = doc.typ.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Err(fail(format!("argument [{name}] type not defined")));
        };
        let Some(description) = doc
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        else {
            return Err(fail(format!("argument [{name}] description not defined")));
        };

        bound_params.push(Bound {
            position,
            name,
            declared: declared.trim(),
            description,
            doc,
        });
    }

    let missing = formal_parameters
        .iter()
        .filter(|p| !documented.contains(p.as_str()))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(fail(format!(
            "arguments not described, missing arguments [{}] definitions",
            missing.join(", ")
        )));
    }

    bound_params.sort_by_key(|b| b.position);

    bound_params
        .into_iter()
        .map(|b| {
            let position = b.position;
            let name = b.name;

            if !is_member_name(name) {
                return Err(fail(format!("argument [{position}] name [{name}] is invalid")));
            }
            if !is_description(b.description) {
                return Err(fail(format!(
                    "argument [{name}] description [{}] is invalid",
                    b.description
                )));
            }

            let constraints = match parse_constraints(&b.doc.tags) {
                Ok(constraints) => constraints,
                Err(key) => return Err(fail(format!("argument [{name}] {key} is not a number"))),
            };

            let Some(typ) = resolve_type(b.declared, building) else {
                return Err(fail(format!("argument [{position}] invalid type [{}]", b.declared)));
            };

            let inapplicable = inapplicable_restrictions(&b.doc.tags, &typ);
            if !inapplicable.is_empty() {
                return Err(SchemaError::invalid(format!(
                    "Action [{label}] {} argument [{position}] invalid restrictions [{}]",
                    b.declared,
                    inapplicable.join(", ")
                )));
            }

            Ok(ArgumentSpec {
                position,
                name: name.to_string(),
                description: b.description.to_string(),
                typ,
                optional: b.doc.has_flag("optional"),
                constraints,
            })
        })
        .collect()
}
