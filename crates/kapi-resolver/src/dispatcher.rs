// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use futures::FutureExt;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use common::{
    context::{CallContext, Session},
    env_const::{DEFAULT_SESSION_FIELD, get_enforce_session_expiry, get_session_field},
    value::Val,
};
use kapi_env::{EnvError, Environment};
use kapi_model::{handler::HandlerError, service::ActionDef, system::ApiSystem};

use crate::{
    coercion::ValueCoercer,
    error::RequestError,
    session::{SessionError, SessionParser},
};

#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    /// Payload field holding the session token; never bound to an argument
    pub session_field: String,
    pub enforce_session_expiry: bool,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            session_field: DEFAULT_SESSION_FIELD.to_string(),
            enforce_session_expiry: true,
        }
    }
}

impl DispatcherOptions {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            session_field: get_session_field(env),
            enforce_session_expiry: get_enforce_session_expiry(env)?,
        })
    }
}

/// Routes `(service, action, payload)` requests to the handlers of a compiled system.
///
/// The system is shared read-only, so one dispatcher may serve any number of concurrent
/// requests.
pub struct ActionDispatcher {
    system: Arc<ApiSystem>,
    session_parser: Option<Arc<dyn SessionParser>>,
    options: DispatcherOptions,
}

impl ActionDispatcher {
    pub fn new(system: Arc<ApiSystem>, options: DispatcherOptions) -> Self {
        Self {
            system,
            session_parser: None,
            options,
        }
    }

    pub fn with_session_parser(mut self, parser: Arc<dyn SessionParser>) -> Self {
        self.session_parser = Some(parser);
        self
    }

    pub fn system(&self) -> &ApiSystem {
        &self.system
    }

    /// Resolve a request into the handler's result (`None` when the action returns nothing).
    #[instrument(name = "ActionDispatcher::resolve", skip(self, payload))]
    pub async fn resolve(
        &self,
        service_name: &str,
        action_name: &str,
        payload: &Value,
    ) -> Result<Option<Value>, RequestError> {
        if service_name.is_empty() {
            return Err(RequestError::ServiceNotSpecified);
        }
        if action_name.is_empty() {
            return Err(RequestError::ActionNotSpecified);
        }

        let service = self
            .system
            .service(service_name)
            .ok_or_else(|| RequestError::ServiceNotFound(service_name.to_string()))?;
        let action = service
            .action(action_name)
            .ok_or_else(|| RequestError::ActionNotFound {
                service: service_name.to_string(),
                action: action_name.to_string(),
            })?;

        let empty = Map::new();
        let fields = match payload {
            Value::Object(fields) => fields,
            _ => &empty,
        };

        let session = self.session(fields).await?;
        let arguments = self.bind_arguments(action, fields)?;

        let Some(handler) = &action.handler.bound else {
            error!(
                "No handler registered under [{}] for {service_name}.{action_name}",
                action.handler.key
            );
            return Err(RequestError::Internal(format!(
                "unbound handler {}",
                action.handler.key
            )));
        };

        let context = CallContext::new(service_name, action_name).with_session(session);
        let outcome = AssertUnwindSafe(handler.invoke(&context, arguments))
            .catch_unwind()
            .await
            .map_err(|_| {
                error!("Handler for {service_name}.{action_name} panicked");
                RequestError::Internal("handler panicked".to_string())
            })?;

        match outcome {
            Ok(result) => Ok(action.return_type.as_ref().and(result)),
            Err(HandlerError::Api(exception)) => {
                debug!("Handler raised {}: {exception}", exception.code);
                Err(RequestError::Api(exception))
            }
            Err(HandlerError::Internal(cause)) => {
                error!("Handler for {service_name}.{action_name} failed: {cause:?}");
                Err(RequestError::Internal(cause.to_string()))
            }
        }
    }

    /// Like [`resolve`](Self::resolve), folded into a single response value: the result (`null`
    /// when there is none) or `{"error": {...}}`.
    pub async fn call(&self, service_name: &str, action_name: &str, payload: &Value) -> Value {
        match self.resolve(service_name, action_name, payload).await {
            Ok(result) => result.unwrap_or(Value::Null),
            Err(error) => {
                debug!("{service_name}.{action_name} rejected with {}", error.code());
                error.to_response()
            }
        }
    }

    async fn session(&self, fields: &Map<String, Value>) -> Result<Option<Session>, RequestError> {
        let Some(parser) = &self.session_parser else {
            return Ok(None);
        };

        let token = match fields.get(&self.options.session_field) {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let session = parser.parse(token).await?;

        if self.options.enforce_session_expiry && session.is_expired_at(now_epoch_seconds()) {
            return Err(SessionError::Expired.into());
        }

        Ok(Some(session))
    }

    /// One value per formal parameter, in handler order.
    fn bind_arguments(
        &self,
        action: &ActionDef,
        fields: &Map<String, Value>,
    ) -> Result<Vec<Val>, RequestError> {
        let coercer = ValueCoercer::new(&self.system);
        let slots = action
            .arguments
            .iter()
            .map(|argument| argument.position + 1)
            .max()
            .unwrap_or_default();
        let mut arguments = vec![Val::Null; slots];

        for argument in &action.arguments {
            let raw = if argument.name == self.options.session_field {
                None
            } else {
                fields.get(&argument.name).filter(|value| !value.is_null())
            };

            arguments[argument.position] = match raw {
                Some(raw) => {
                    coercer.coerce(&argument.name, &argument.typ, &argument.constraints, raw)?
                }
                None if argument.optional => Val::Null,
                None => return Err(RequestError::ArgumentCannotBeEmpty(argument.name.clone())),
            };
        }

        Ok(arguments)
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
