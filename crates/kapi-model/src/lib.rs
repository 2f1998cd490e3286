// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The compiled API registry: object types, enums, services and their actions.
//!
//! An [`system::ApiSystem`] is produced once by `kapi-model-builder` and is read-only afterwards.
//! The dispatcher in `kapi-resolver` consults it for every request.

pub mod field_type;
pub mod handler;
pub mod introspection;
pub mod mapped_arena;
pub mod primitive_type;
pub mod service;
pub mod system;
pub mod types;
