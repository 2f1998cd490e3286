// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Request-time processing against a compiled [`kapi_model::system::ApiSystem`]: argument
//! coercion and action dispatch.

pub mod coercion;
pub mod dispatcher;
pub mod error;
pub mod session;

pub use dispatcher::{ActionDispatcher, DispatcherOptions};
pub use error::RequestError;

#[cfg(test)]
mod test_util;
