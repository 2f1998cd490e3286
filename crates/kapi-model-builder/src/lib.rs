// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Compiles declaration sources into a frozen [`kapi_model::system::ApiSystem`].
//!
//! Building happens in one synchronous pass: the built-in prelude, enums, object type shells (with
//! their inheritance resolved), properties, then services and their actions. The first malformed
//! declaration aborts the build with a [`error::SchemaError`].

pub mod builder;
pub mod declaration;
pub mod error;
pub mod loader;

pub use builder::system_builder::{BuildOptions, SystemLoader, build};
