// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use kapi_model::handler::ApiException;

use crate::session::SessionError;

/// A per-request failure. Every variant has a stable code and a rendered message.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Service name not specified")]
    ServiceNotSpecified,

    #[error("Action name not specified")]
    ActionNotSpecified,

    #[error("Service [{0}] does not exist")]
    ServiceNotFound(String),

    #[error("Action [{action}] does not exist for service [{service}]")]
    ActionNotFound { service: String, action: String },

    #[error("Argument [{0}] cannot be empty")]
    ArgumentCannotBeEmpty(String),

    #[error("Argument [{0}] must be numeric")]
    MustBeNumeric(String),

    #[error("Argument [{argument}] minimum value is [{bound}]")]
    MinValueCrossed { argument: String, bound: i64 },

    #[error("Argument [{argument}] maximum value is [{bound}]")]
    MaxValueCrossed { argument: String, bound: i64 },

    #[error("Argument [{argument}] minimum length is [{bound}]")]
    MinLengthCrossed { argument: String, bound: i64 },

    #[error("Argument [{argument}] maximum length is [{bound}]")]
    MaxLengthCrossed { argument: String, bound: i64 },

    #[error("Argument [{0}] value must be of type [boolean]")]
    MustBeBoolean(String),

    #[error("Argument [{argument}] values must be of type [{enum_name}]")]
    InvalidEnumValue { argument: String, enum_name: String },

    #[error("Argument [{argument}] object type [{object_type}] is not supported")]
    ObjectTypeNotSupported {
        argument: String,
        object_type: String,
    },

    #[error("Abstract parameter type [{0}]")]
    AbstractParameter(String),

    #[error("Argument [{argument}] must be an object of type [{type_name}]")]
    MustBeObject { argument: String, type_name: String },

    #[error("Argument [{0}] must be an array")]
    MustBeArray(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Raised by a handler
    #[error("{0}")]
    Api(ApiException),

    /// The detail is logged, never reported
    #[error("Internal server error occurred")]
    Internal(String),
}

/// The `error` member of a failure response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
}

impl RequestError {
    pub fn code(&self) -> &str {
        match self {
            RequestError::ServiceNotSpecified => "SERVICE_NOT_SPECIFIED",
            RequestError::ActionNotSpecified => "ACTION_NOT_SPECIFIED",
            RequestError::ServiceNotFound(_) => "SERVICE_DOES_NOT_EXISTS",
            RequestError::ActionNotFound { .. } => "ACTION_DOES_NOT_EXISTS",
            RequestError::ArgumentCannotBeEmpty(_) => "ARGUMENT_CANNOT_BE_EMPTY",
            RequestError::MustBeNumeric(_) => "ARGUMENT_MUST_BE_NUMERIC",
            RequestError::MinValueCrossed { .. } => "ARGUMENT_MIN_VALUE_CROSSED",
            RequestError::MaxValueCrossed { .. } => "ARGUMENT_MAX_VALUE_CROSSED",
            RequestError::MinLengthCrossed { .. } => "ARGUMENT_MIN_LENGTH_CROSSED",
            RequestError::MaxLengthCrossed { .. } => "ARGUMENT_MAX_LENGTH_CROSSED",
            RequestError::MustBeBoolean(_) => "ARGUMENT_MUST_BE_BOOLEAN",
            RequestError::InvalidEnumValue { .. } => "ARGUMENT_INVALID_ENUM_VALUE",
            RequestError::ObjectTypeNotSupported { .. } => "OBJECT_TYPE_NOT_SUPPORTED",
            RequestError::AbstractParameter(_) => "ABSTRACT_PARAMETER",
            RequestError::MustBeObject { .. } => "ARGUMENT_MUST_BE_OBJECT",
            RequestError::MustBeArray(_) => "ARGUMENT_MUST_BE_ARRAY",
            RequestError::Session(error) => error.code(),
            RequestError::Api(exception) => &exception.code,
            RequestError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Structured details: the offending argument and, where one was crossed, the bound.
    pub fn args(&self) -> Map<String, Value> {
        fn entries(pairs: &[(&str, String)]) -> Map<String, Value> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                .collect()
        }

        match self {
            RequestError::ServiceNotFound(service) => entries(&[("service", service.clone())]),
            RequestError::ActionNotFound { service, action } => entries(&[
                ("service", service.clone()),
                ("action", action.clone()),
            ]),
            RequestError::ArgumentCannotBeEmpty(argument)
            | RequestError::MustBeNumeric(argument)
            | RequestError::MustBeBoolean(argument)
            | RequestError::MustBeArray(argument) => entries(&[("argument", argument.clone())]),
            RequestError::MinValueCrossed { argument, bound } => entries(&[
                ("argument", argument.clone()),
                ("minValue", bound.to_string()),
            ]),
            RequestError::MaxValueCrossed { argument, bound } => entries(&[
                ("argument", argument.clone()),
                ("maxValue", bound.to_string()),
            ]),
            RequestError::MinLengthCrossed { argument, bound } => entries(&[
                ("argument", argument.clone()),
                ("minLength", bound.to_string()),
            ]),
            RequestError::MaxLengthCrossed { argument, bound } => entries(&[
                ("argument", argument.clone()),
                ("maxLength", bound.to_string()),
            ]),
            RequestError::InvalidEnumValue {
                argument,
                enum_name,
            } => entries(&[
                ("argument", argument.clone()),
                ("enumType", enum_name.clone()),
            ]),
            RequestError::ObjectTypeNotSupported {
                argument,
                object_type,
            } => entries(&[
                ("argument", argument.clone()),
                ("objectType", object_type.clone()),
            ]),
            RequestError::MustBeObject {
                argument,
                type_name,
            } => entries(&[
                ("argument", argument.clone()),
                ("objectType", type_name.clone()),
            ]),
            RequestError::AbstractParameter(type_name) => {
                entries(&[("objectType", type_name.clone())])
            }
            RequestError::Api(exception) => exception
                .args
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            RequestError::ServiceNotSpecified
            | RequestError::ActionNotSpecified
            | RequestError::Session(_)
            | RequestError::Internal(_) => Map::new(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
            args: self.args(),
        }
    }

    /// The uniform failure response: `{"error": {"code", "message", "args"?}}`.
    pub fn to_response(&self) -> Value {
        let mut response = Map::new();
        response.insert(
            "error".to_string(),
            serde_json::to_value(self.body()).unwrap_or(Value::Null),
        );
        Value::Object(response)
    }
}
