// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod object;
mod val;

pub use object::ObjectInstance;
pub use val::{FALSE, TRUE, Val};

/// The payload field that selects a concrete subtype for an object-typed value.
pub const OBJECT_TYPE_FIELD: &str = "objectType";
