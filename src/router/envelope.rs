use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SupervisorError;

/// A named request from the foreground side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl Request {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Request without arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }

    /// ASCII case-insensitive method match.
    #[inline]
    pub fn is(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// True if the method matches any of `methods`.
    pub fn is_any(&self, methods: &[&str]) -> bool {
        methods.iter().any(|m| self.is(m))
    }

    /// Decodes the arguments into `T`.
    ///
    /// Missing arguments (`null`) decode as an empty object, so argument
    /// structs made of optional fields accept bare requests.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, SupervisorError> {
        let args = match &self.arguments {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        serde_json::from_value(args).map_err(|e| SupervisorError::MalformedRequest {
            method: self.method.clone(),
            reason: e.to_string(),
        })
    }
}

/// Answer to a [`Request`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum Response {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

impl Response {
    /// `Success(null)`.
    pub fn ok() -> Self {
        Response::Success(Value::Null)
    }

    /// Serializes `value` into a success; a serialization failure becomes an error response.
    pub fn success<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Response::Success(v),
            Err(e) => Response::Error {
                code: "serialization_failed".to_string(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// Error code, if this is an error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Response::Error { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}

impl From<SupervisorError> for Response {
    fn from(err: SupervisorError) -> Self {
        Response::Error {
            code: err.as_label().to_string(),
            message: err.as_message(),
        }
    }
}

impl From<Result<Value, SupervisorError>> for Response {
    fn from(res: Result<Value, SupervisorError>) -> Self {
        match res {
            Ok(v) => Response::Success(v),
            Err(e) => e.into(),
        }
    }
}
