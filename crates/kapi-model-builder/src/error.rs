// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use kapi_env::EnvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// A malformed declaration
    #[error("{0}")]
    Invalid(String),

    #[error("Declaration file [{}] could not be read: {source}", .path.display())]
    IO {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Declaration file [{}] could not be parsed: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error(
        "Declaration file [{}] must have a .json, .yaml or .yml extension",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Env(#[from] EnvError),
}

impl SchemaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SchemaError::Invalid(message.into())
    }
}
