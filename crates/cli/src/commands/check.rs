// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use clap::{ArgMatches, Command};
use colored::Colorize;

use kapi_env::SystemEnvironment;

use super::{
    command::{CommandDefinition, prefix_arg, sources_arg},
    util::build_system,
};

pub(crate) struct CheckCommandDefinition {}

impl CommandDefinition for CheckCommandDefinition {
    fn command(&self) -> Command {
        Command::new("check")
            .about("Validate declaration sources")
            .arg(sources_arg())
            .arg(prefix_arg())
    }

    fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let system = match build_system(matches, &SystemEnvironment) {
            Ok(system) => system,
            Err(e) => {
                eprintln!("{}", "Declarations are invalid".red().bold());
                return Err(e);
            }
        };

        let actions: usize = system
            .services
            .iter()
            .map(|(_, service)| service.actions.len())
            .sum();

        println!(
            "{} {} services, {actions} actions, {} types, {} enums",
            "Declarations are valid:".green().bold(),
            system.services.len(),
            system.types.len(),
            system.enums.len()
        );

        Ok(())
    }
}
