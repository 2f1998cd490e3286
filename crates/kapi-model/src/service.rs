// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;

use crate::{
    field_type::{FieldType, ValueConstraints},
    handler::HandlerRef,
};

#[derive(Debug, Clone)]
pub struct ServiceDef {
    pub name: String,
    pub description: String,
    pub actions: IndexMap<String, ActionDef>,
}

impl ServiceDef {
    pub fn action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct ActionDef {
    pub name: String,
    pub description: String,
    /// Sorted by `position`
    pub arguments: Vec<ArgumentSpec>,
    /// `None` when the action returns nothing (any handler result is discarded)
    pub return_type: Option<FieldType>,
    pub handler: HandlerRef,
}

#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    /// Index of the argument in the handler's formal parameter list
    pub position: usize,
    pub name: String,
    pub description: String,
    pub typ: FieldType,
    pub optional: bool,
    pub constraints: ValueConstraints,
}
