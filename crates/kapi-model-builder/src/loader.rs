// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{declaration::DeclarationSource, error::SchemaError};

enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Some(SourceFormat::Json),
            Some("yaml" | "yml") => Some(SourceFormat::Yaml),
            _ => None,
        }
    }
}

/// Load one declaration source per file, in the given order.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<DeclarationSource>, SchemaError> {
    if paths.is_empty() {
        return Err(SchemaError::invalid(
            "Declaration files expected to be a non-empty list of paths",
        ));
    }

    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        return Err(SchemaError::invalid(format!(
            "Declaration file [{}] does not exist",
            missing.display()
        )));
    }

    paths.iter().map(|path| load_source(path)).collect()
}

pub fn load_source(path: &Path) -> Result<DeclarationSource, SchemaError> {
    let format =
        SourceFormat::of(path).ok_or_else(|| SchemaError::UnsupportedFormat(path.to_path_buf()))?;

    let contents = std::fs::read_to_string(path).map_err(|source| SchemaError::IO {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| SchemaError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let source: DeclarationSource = match format {
        SourceFormat::Json => {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        }
        SourceFormat::Yaml => {
            serde_saphyr::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        }
    };

    debug!(
        "Loaded declaration source {} ({} records) from {}",
        source.name,
        source.records.len(),
        path.display()
    );

    Ok(source)
}
