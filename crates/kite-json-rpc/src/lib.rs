//! # JSON-RPC 2.0 Message Handling
//!
//! A pure, transport-agnostic JSON-RPC 2.0 message-handling core. This crate
//! turns raw request text into validated messages, dispatches them against a
//! host-supplied method registry, and shapes the reply text, without any
//! transport-specific code.
//!
//! ## Features
//! - Full JSON-RPC 2.0 specification compliance
//! - Transport agnostic (works with HTTP, WebSocket, stdio, etc.)
//! - Batch dispatch with concurrently polled handlers and ordered replies
//! - Domain errors kept separate from protocol errors, with pass-through codes
//! - Notifications are fire-and-forget and never produce a response
//! - Async/await support with `async` feature (enabled by default)
//!
//! ## Quick Start
//!
//! ```rust
//! use kite_json_rpc::prelude::*;
//! use serde_json::Value;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl JsonRpcHandler for Echo {
//!     async fn handle(&self, _method: &str, params: Option<RequestParams>) -> MethodResult<Value> {
//!         Ok(params.map(|p| p.to_value()).unwrap_or(Value::Null))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut dispatcher = JsonRpcDispatcher::new();
//!     dispatcher.register_method("echo", Echo);
//!     let server = JsonRpcServer::new(dispatcher);
//!
//!     let reply = server
//!         .handle_request(r#"{"jsonrpc": "2.0", "id": 1, "method": "echo", "params": [1, 2]}"#)
//!         .await;
//!     assert_eq!(reply.unwrap(), r#"{"jsonrpc":"2.0","id":1,"result":[1,2]}"#);
//! }
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod notification;
pub mod request;
pub mod response;
pub mod types;

#[cfg(feature = "async")]
pub mod dispatch;
#[cfg(feature = "async")]
pub mod server;

pub mod prelude;

// Re-export main types
pub use decode::{InboundItem, InboundPayload, parse_json_rpc_payload};
pub use encode::OutboundPayload;
pub use error::{
    JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, MethodError, MethodResult, ToJsonRpcError,
};
pub use notification::JsonRpcNotification;
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use dispatch::{FunctionHandler, JsonRpcDispatcher, JsonRpcHandler};
#[cfg(feature = "async")]
pub use server::JsonRpcServer;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
