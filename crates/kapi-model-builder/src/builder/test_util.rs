// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Declaration fixtures shared by the builder tests.

use serde_json::{Value, json};

use kapi_model::{handler::HandlerRegistry, system::ApiSystem};

use crate::{
    declaration::DeclarationSource,
    builder::system_builder::{BuildOptions, build},
};

pub(crate) fn source(name: &str, exports: &[&str], records: Vec<Value>) -> DeclarationSource {
    serde_json::from_value(json!({
        "name": name,
        "exports": exports,
        "records": records,
    }))
    .unwrap()
}

pub(crate) fn service_module(service: &str, description: Option<&str>) -> Value {
    json!({
        "kind": "module",
        "qualifiedName": "Controller",
        "description": description,
        "tags": {"service": service},
    })
}

/// A callable of `Controller` with an explicit formal parameter list.
pub(crate) fn action(name: &str, parameters: &[&str], params: Value) -> Value {
    json!({
        "kind": "callable",
        "qualifiedName": format!("Controller.{name}"),
        "ownerQualifiedName": "Controller",
        "description": "Do something",
        "tags": {"action": name},
        "params": params,
        "parameters": parameters,
    })
}

pub(crate) fn object(name: &str, extends: Option<&str>, description: &str) -> Value {
    json!({
        "kind": "type",
        "qualifiedName": name,
        "extends": extends,
        "description": description,
    })
}

pub(crate) fn property(owner: &str, accessor: &str, name: &str, typ: &str) -> Value {
    json!({
        "kind": "property",
        "qualifiedName": format!("{owner}.{accessor}"),
        "ownerQualifiedName": owner,
        "description": "Some property",
        "tags": {"property": name, "type": typ},
    })
}

/// A `test` service whose single action takes the given documented arguments.
pub(crate) fn controller_with(parameters: &[&str], params: Value) -> DeclarationSource {
    source(
        "controller",
        &[],
        vec![
            service_module("test", Some("Test")),
            action("doNothing", parameters, params),
        ],
    )
}

pub(crate) fn build_ok(sources: Vec<DeclarationSource>) -> ApiSystem {
    build(sources, &HandlerRegistry::new(), BuildOptions::default()).unwrap()
}

pub(crate) fn build_error(sources: Vec<DeclarationSource>) -> String {
    build(sources, &HandlerRegistry::new(), BuildOptions::default())
        .unwrap_err()
        .to_string()
}
