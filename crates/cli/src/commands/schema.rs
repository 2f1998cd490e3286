// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fs::File, io::Write, path::PathBuf};

use anyhow::Result;
use clap::{ArgMatches, Command};

use kapi_env::{Environment, SystemEnvironment};
use kapi_model::introspection::SchemaDocument;

use super::{
    command::{CommandDefinition, get, output_arg, prefix_arg, sources_arg},
    util::build_system,
};

pub(crate) struct SchemaCommandDefinition {}

impl SchemaCommandDefinition {
    fn write_schema(&self, matches: &ArgMatches, env: &dyn Environment) -> Result<()> {
        let system = build_system(matches, env)?;
        let document = SchemaDocument::new(&system);

        match get::<PathBuf>(matches, "output") {
            Some(output) => {
                serde_json::to_writer_pretty(&mut File::create(output)?, &document)?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, &document)?;
                writeln!(stdout)?;
            }
        }

        Ok(())
    }
}

impl CommandDefinition for SchemaCommandDefinition {
    fn command(&self) -> Command {
        Command::new("schema")
            .about("Print the introspection document of the compiled services")
            .arg(sources_arg())
            .arg(prefix_arg())
            .arg(output_arg())
    }

    fn execute(&self, matches: &ArgMatches) -> Result<()> {
        self.write_schema(matches, &SystemEnvironment)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use kapi_env::MapEnvironment;
    use serde_json::{Value, json};

    use super::*;

    fn write_sources(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("controller.json");
        fs::write(
            &path,
            json!({
                "name": "controller",
                "records": [
                    {
                        "kind": "module",
                        "qualifiedName": "Controller",
                        "description": "Test service",
                        "tags": {"service": "test"},
                    },
                    {
                        "kind": "callable",
                        "qualifiedName": "Controller.doNothing",
                        "ownerQualifiedName": "Controller",
                        "description": "Do nothing",
                        "tags": {"action": "doNothing"},
                        "params": [],
                        "parameters": [],
                    },
                ],
            })
            .to_string(),
        )
        .unwrap();
        path
    }

    #[test]
    fn writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_sources(dir.path());
        let output = dir.path().join("schema.json");

        let definition = SchemaCommandDefinition {};
        let matches = definition.command().get_matches_from([
            "schema",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        definition
            .write_schema(&matches, &MapEnvironment::new())
            .unwrap();

        let document: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(document["services"][0]["name"], "test");
        assert_eq!(document["services"][0]["actions"][0]["name"], "doNothing");
    }

    #[test]
    fn prefix_flag_overrides_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_sources(dir.path());
        let output = dir.path().join("schema.json");

        let definition = SchemaCommandDefinition {};
        let matches = definition.command().get_matches_from([
            "schema",
            source.to_str().unwrap(),
            "--prefix",
            "Acme",
            "-o",
            output.to_str().unwrap(),
        ]);
        definition
            .write_schema(&matches, &MapEnvironment::from([("KAPI_TYPE_PREFIX", "Other")]))
            .unwrap();

        let document: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        let types = document["types"]
            .as_array()
            .unwrap()
            .iter()
            .map(|typ| typ["name"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert!(types.contains(&"AcmeObject".to_string()));
    }
}
