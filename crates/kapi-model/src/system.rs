// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    mapped_arena::MappedArena,
    service::{ActionDef, ServiceDef},
    types::{EnumDef, PropertySpec, TypeDef, TypeId},
};

/// The frozen registry of everything a set of declaration sources defined.
#[derive(Debug)]
pub struct ApiSystem {
    pub types: MappedArena<TypeDef>,
    pub enums: MappedArena<EnumDef>,
    pub services: MappedArena<ServiceDef>,
    /// The implicit base of every object type (`KalturaObject` under the default prefix)
    pub object_root: TypeId,
}

impl ApiSystem {
    pub fn service(&self, name: &str) -> Option<&ServiceDef> {
        self.services.get_by_key(name)
    }

    pub fn action(&self, service: &str, action: &str) -> Option<&ActionDef> {
        self.service(service).and_then(|service| service.action(action))
    }

    /// The type itself, then each base up to (and including) the root.
    pub fn ancestry(&self, id: TypeId) -> impl Iterator<Item = &TypeDef> {
        std::iter::successors(Some(&self.types[id]), |typ| {
            typ.base.map(|base| &self.types[base])
        })
    }

    /// Every property an instance of the type carries: its own first, then inherited ones.
    /// A property redeclared closer to the type shadows the inherited declaration.
    pub fn effective_properties(&self, id: TypeId) -> Vec<&PropertySpec> {
        let mut properties: Vec<&PropertySpec> = vec![];
        for typ in self.ancestry(id) {
            for property in &typ.properties {
                if !properties.iter().any(|seen| seen.name == property.name) {
                    properties.push(property);
                }
            }
        }
        properties
    }

    /// The registered subtype of `declared` named `name`, if there is one.
    pub fn descendant_named(&self, declared: TypeId, name: &str) -> Option<TypeId> {
        self.types
            .get_id(name)
            .filter(|candidate| self.types[declared].has_descendant(*candidate))
    }

    /// `service.action` for every action whose handler key had no registered handler.
    pub fn unbound_actions(&self) -> Vec<String> {
        self.services
            .iter()
            .flat_map(|(_, service)| {
                service
                    .actions
                    .values()
                    .filter(|action| action.handler.bound.is_none())
                    .map(|action| format!("{}.{}", service.name, action.name))
            })
            .collect()
    }
}
