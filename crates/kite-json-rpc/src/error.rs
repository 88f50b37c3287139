use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => -32700,
            JsonRpcErrorCode::InvalidRequest => -32600,
            JsonRpcErrorCode::MethodNotFound => -32601,
            JsonRpcErrorCode::InvalidParams => -32602,
            JsonRpcErrorCode::InternalError => -32603,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC error object: the `error` member of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::InvalidParams,
            Some(message.to_string()),
            None,
        )
    }

    pub fn internal_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, None, data)
    }

    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        assert!(
            (-32099..=-32000).contains(&code),
            "Server error code must be in range -32099 to -32000"
        );
        Self::new(
            JsonRpcErrorCode::ServerError(code),
            Some(message.to_string()),
            data,
        )
    }
}

/// JSON-RPC error response. `id` is `None` when the request id could not be
/// determined, which serializes as `"id":null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            error,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(None, JsonRpcErrorObject::parse_error(None))
    }

    pub fn invalid_request(id: Option<RequestId>) -> Self {
        Self::new(id, JsonRpcErrorObject::invalid_request(None))
    }

    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(Some(id), JsonRpcErrorObject::method_not_found(method))
    }

    pub fn invalid_params(id: RequestId, message: &str) -> Self {
        Self::new(Some(id), JsonRpcErrorObject::invalid_params(message))
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Trait for domain error types that declare their own wire representation.
///
/// Implementing this is how host code raises custom errors through a method
/// handler: the dispatcher never learns the concrete type, only the declared
/// code, message, and optional data.
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    /// Convert this error to a JSON-RPC error object.
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

/// Failure of a dispatched method call.
///
/// Handlers return this from [`handle`](crate::dispatch::JsonRpcHandler::handle);
/// the dispatcher maps it onto the wire. Domain error types implementing
/// [`ToJsonRpcError`] convert into [`MethodError::Domain`] automatically, so
/// handler bodies can use `?` on their own error types.
#[derive(Debug, Error)]
pub enum MethodError {
    /// The supplied params did not match what the method expects.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// A declared domain error, passed through with its own code.
    #[error("{}", .0.message)]
    Domain(JsonRpcErrorObject),
    /// Any unrecognized failure. The detail stays out of the response unless
    /// the dispatcher has diagnostics enabled.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MethodError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        MethodError::InvalidParams(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MethodError::Internal(message.into())
    }

    /// Declare a server-defined error (-32099 to -32000) inline, without a
    /// dedicated error type.
    pub fn server_error(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        MethodError::Domain(JsonRpcErrorObject::server_error(code, &message.into(), data))
    }

    /// Map onto the wire error object. Internal detail is emitted as
    /// `data: {"detail": ...}` only when `expose_internal` is set.
    pub fn into_error_object(self, expose_internal: bool) -> JsonRpcErrorObject {
        match self {
            MethodError::InvalidParams(message) => JsonRpcErrorObject::invalid_params(&message),
            MethodError::Domain(object) => object,
            MethodError::Internal(detail) => {
                let data = expose_internal.then(|| json!({ "detail": detail }));
                JsonRpcErrorObject::internal_error(data)
            }
        }
    }
}

impl<E: ToJsonRpcError> From<E> for MethodError {
    fn from(error: E) -> Self {
        MethodError::Domain(error.to_error_object())
    }
}

/// Result of a method handler call.
pub type MethodResult<T> = Result<T, MethodError>;
