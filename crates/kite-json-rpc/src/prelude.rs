//! # JSON-RPC Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the library.
//!
//! ```rust
//! use kite_json_rpc::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::decode::{InboundItem, InboundPayload, parse_json_rpc_payload};
pub use crate::encode::OutboundPayload;
pub use crate::error::{
    JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, MethodError, MethodResult, ToJsonRpcError,
};
pub use crate::notification::JsonRpcNotification;
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use crate::types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use crate::dispatch::{FunctionHandler, JsonRpcDispatcher, JsonRpcHandler};
#[cfg(feature = "async")]
pub use crate::server::JsonRpcServer;

// Essential async trait for handler implementations
#[cfg(feature = "async")]
pub use async_trait::async_trait;

// Standard error codes
pub use crate::error_codes::*;
