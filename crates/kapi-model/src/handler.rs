// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Action handlers: the code that runs once a call's arguments have been coerced.
//!
//! Declarations name a handler by key (`boundArtifact`, defaulting to the callable's qualified
//! name). The schema builder looks each key up in a [`HandlerRegistry`] and stores the match in
//! the action's [`HandlerRef`]. Actions without a registered handler still build, so a schema can
//! be checked on its own, but calling them fails at dispatch.

use std::{collections::HashMap, fmt::Debug, future::Future, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use common::{context::CallContext, value::Val};

#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Formal parameter names, in the order `invoke` expects its arguments.
    fn parameters(&self) -> &[String];

    /// Run the action. `arguments` holds one coerced value per formal parameter, with
    /// [`Val::Null`] for omitted optional arguments.
    async fn invoke(
        &self,
        context: &CallContext,
        arguments: Vec<Val>,
    ) -> Result<Option<serde_json::Value>, HandlerError>;
}

#[derive(Error, Debug)]
pub enum HandlerError {
    /// An error meant for the caller, reported with its own code
    #[error("{0}")]
    Api(ApiException),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A structured error raised by a handler.
#[derive(Error, Debug, Clone, Serialize)]
#[error("{message}")]
pub struct ApiException {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, String>,
}

impl ApiException {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            args: IndexMap::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

impl From<ApiException> for HandlerError {
    fn from(exception: ApiException) -> Self {
        HandlerError::Api(exception)
    }
}

/// A handler backed by an async closure.
pub struct FnHandler<F> {
    parameters: Vec<String>,
    function: F,
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(CallContext, Vec<Val>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<serde_json::Value>, HandlerError>> + Send,
{
    pub fn new(parameters: &[&str], function: F) -> Self {
        Self {
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            function,
        }
    }
}

#[async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(CallContext, Vec<Val>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<serde_json::Value>, HandlerError>> + Send,
{
    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    async fn invoke(
        &self,
        context: &CallContext,
        arguments: Vec<Val>,
    ) -> Result<Option<serde_json::Value>, HandlerError> {
        (self.function)(context.clone(), arguments).await
    }
}

#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn with(mut self, key: impl Into<String>, handler: impl ActionHandler + 'static) -> Self {
        self.register(key, Arc::new(handler));
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(key).cloned()
    }
}

/// The handler key an action was declared with, and the handler found for it (if any).
#[derive(Clone)]
pub struct HandlerRef {
    pub key: String,
    pub bound: Option<Arc<dyn ActionHandler>>,
}

impl Debug for HandlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRef")
            .field("key", &self.key)
            .field("bound", &self.bound.is_some())
            .finish()
    }
}
