// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::HashSet, path::PathBuf};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use common::env_const::{DEFAULT_TYPE_PREFIX, get_type_prefix};
use kapi_env::Environment;
use kapi_model::{
    handler::HandlerRegistry,
    mapped_arena::MappedArena,
    service::ServiceDef,
    system::ApiSystem,
    types::{EnumDef, TypeDef, TypeId},
};

use crate::{declaration::DeclarationSource, error::SchemaError, loader};

use super::{enum_builder, naming::TypeNaming, prelude, service_builder, type_builder};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Prefix of every type and enum name
    pub type_prefix: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            type_prefix: DEFAULT_TYPE_PREFIX.to_string(),
        }
    }
}

impl BuildOptions {
    pub fn from_env(env: &dyn Environment) -> Result<Self, SchemaError> {
        Ok(Self {
            type_prefix: get_type_prefix(env)?,
        })
    }
}

#[derive(Debug)]
pub struct SystemContextBuilding {
    pub types: MappedArena<TypeDef>,
    pub enums: MappedArena<EnumDef>,
    pub services: MappedArena<ServiceDef>,
    pub object_root: TypeId,
}

impl SystemContextBuilding {
    pub(crate) fn with_prelude(naming: &TypeNaming) -> Result<Self, SchemaError> {
        let mut types = MappedArena::default();
        let object_root = prelude::build(naming, &mut types)?;

        Ok(Self {
            types,
            enums: MappedArena::default(),
            services: MappedArena::default(),
            object_root,
        })
    }

    fn into_system(self) -> ApiSystem {
        ApiSystem {
            types: self.types,
            enums: self.enums,
            services: self.services,
            object_root: self.object_root,
        }
    }
}

/// Collects declaration sources, then compiles them in a single pass.
pub struct SystemLoader {
    options: BuildOptions,
    sources: IndexMap<String, DeclarationSource>,
}

impl SystemLoader {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            sources: IndexMap::new(),
        }
    }

    pub fn add_source(&mut self, source: DeclarationSource) -> Result<(), SchemaError> {
        if self.sources.contains_key(&source.name) {
            return Err(SchemaError::invalid(format!(
                "Source [{}] appears more than once",
                source.name
            )));
        }
        self.sources.insert(source.name.clone(), source);
        Ok(())
    }

    pub fn add_files(&mut self, paths: &[PathBuf]) -> Result<(), SchemaError> {
        for source in loader::load_sources(paths)? {
            self.add_source(source)?;
        }
        Ok(())
    }

    /// Compile every added source. Actions are bound to the handlers registered under their
    /// handler keys; an action without one still compiles.
    #[instrument(name = "SystemLoader::build", skip_all, fields(sources = self.sources.len()))]
    pub fn build(&self, handlers: &HandlerRegistry) -> Result<ApiSystem, SchemaError> {
        let naming = TypeNaming::new(&self.options.type_prefix)?;
        let ordered = ordered_sources(&self.sources)?;

        let mut building = SystemContextBuilding::with_prelude(&naming)?;

        enum_builder::build(&ordered.type_scanned, &naming, &mut building)?;
        type_builder::build(&ordered.type_scanned, &naming, &mut building)?;
        service_builder::build(&ordered.all, handlers, &mut building)?;

        debug!(
            "Built {} services, {} types, {} enums",
            building.services.len(),
            building.types.len(),
            building.enums.len()
        );

        Ok(building.into_system())
    }
}

pub fn build(
    sources: impl IntoIterator<Item = DeclarationSource>,
    handlers: &HandlerRegistry,
    options: BuildOptions,
) -> Result<ApiSystem, SchemaError> {
    let mut loader = SystemLoader::new(options);
    for source in sources {
        loader.add_source(source)?;
    }
    loader.build(handlers)
}

struct OrderedSources<'a> {
    /// Each source after the sources whose types it scans
    all: Vec<&'a DeclarationSource>,
    /// The subset whose enums and types get registered: sources no other source requires, and
    /// whatever they reach through `scanTypes` requirements
    type_scanned: Vec<&'a DeclarationSource>,
}

fn ordered_sources(
    sources: &IndexMap<String, DeclarationSource>,
) -> Result<OrderedSources<'_>, SchemaError> {
    fn visit<'a>(
        source: &'a DeclarationSource,
        sources: &'a IndexMap<String, DeclarationSource>,
        visited: &mut HashSet<&'a str>,
        ordered: &mut Vec<&'a DeclarationSource>,
    ) -> Result<(), SchemaError> {
        if !visited.insert(&source.name) {
            return Ok(());
        }

        for requirement in &source.requires {
            let required = sources.get(&requirement.source).ok_or_else(|| {
                SchemaError::invalid(format!(
                    "Source [{}] requires unknown source [{}]",
                    source.name, requirement.source
                ))
            })?;
            if requirement.scan_types {
                visit(required, sources, visited, ordered)?;
            }
        }

        ordered.push(source);
        Ok(())
    }

    fn mark_scanned<'a>(
        source: &'a DeclarationSource,
        sources: &'a IndexMap<String, DeclarationSource>,
        scanned: &mut HashSet<&'a str>,
    ) {
        if !scanned.insert(&source.name) {
            return;
        }
        for requirement in source.requires.iter().filter(|r| r.scan_types) {
            if let Some(required) = sources.get(&requirement.source) {
                mark_scanned(required, sources, scanned);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut all = vec![];
    for source in sources.values() {
        visit(source, sources, &mut visited, &mut all)?;
    }

    let required: HashSet<&str> = sources
        .values()
        .flat_map(|source| source.requires.iter().map(|r| r.source.as_str()))
        .collect();
    let mut scanned = HashSet::new();
    for source in sources
        .values()
        .filter(|source| !required.contains(source.name.as_str()))
    {
        mark_scanned(source, sources, &mut scanned);
    }

    let type_scanned = all
        .iter()
        .copied()
        .filter(|source| scanned.contains(source.name.as_str()))
        .collect();

    Ok(OrderedSources { all, type_scanned })
}
