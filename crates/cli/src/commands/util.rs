// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

use kapi_env::Environment;
use kapi_model::{handler::HandlerRegistry, system::ApiSystem};
use kapi_model_builder::{BuildOptions, SystemLoader};

use super::command::{get, get_many};

/// Compile the sources named on the command line. No handlers are registered, so every action
/// comes out unbound.
pub(super) fn build_system(matches: &ArgMatches, env: &dyn Environment) -> Result<ApiSystem> {
    let sources: Vec<PathBuf> = get_many(matches, "sources");

    let mut options = BuildOptions::from_env(env)?;
    if let Some(prefix) = get::<String>(matches, "prefix") {
        options.type_prefix = prefix;
    }

    let mut loader = SystemLoader::new(options);
    loader.add_files(&sources)?;

    Ok(loader.build(&HandlerRegistry::new())?)
}
