//! Method dispatch against a host-supplied registry.
//!
//! The dispatcher owns the mapping from method names to handlers and turns
//! every possible handler outcome into a wire reply: success, a declared
//! domain error, invalid params, or -32603 for anything unrecognized,
//! including a panic inside the handler. Nothing escapes as a crash.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::decode::{InboundItem, InboundPayload};
use crate::encode::OutboundPayload;
use crate::error::{JsonRpcError, MethodError, MethodResult};
use crate::notification::JsonRpcNotification;
use crate::request::{JsonRpcRequest, RequestParams};
use crate::response::JsonRpcMessage;

/// Trait for handling JSON-RPC method calls.
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// Handle a method call.
    ///
    /// Params arrive exactly as decoded: positional, named, or absent; the
    /// handler owns binding them and returns
    /// [`MethodError::InvalidParams`](crate::error::MethodError) on a
    /// mismatch. Domain error types implementing
    /// [`ToJsonRpcError`](crate::error::ToJsonRpcError) can be raised with
    /// `?`.
    async fn handle(&self, method: &str, params: Option<RequestParams>) -> MethodResult<Value>;

    /// Methods this handler serves, for registration convenience.
    fn supported_methods(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A handler backed by a single async closure.
pub struct FunctionHandler<F>
where
    F: Fn(&str, Option<RequestParams>) -> BoxFuture<'static, MethodResult<Value>> + Send + Sync,
{
    handler_fn: F,
}

impl<F> FunctionHandler<F>
where
    F: Fn(&str, Option<RequestParams>) -> BoxFuture<'static, MethodResult<Value>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> JsonRpcHandler for FunctionHandler<F>
where
    F: Fn(&str, Option<RequestParams>) -> BoxFuture<'static, MethodResult<Value>> + Send + Sync,
{
    async fn handle(&self, method: &str, params: Option<RequestParams>) -> MethodResult<Value> {
        (self.handler_fn)(method, params).await
    }
}

/// JSON-RPC method dispatcher.
///
/// Holds the read-only method registry; every dispatch entry point takes
/// `&self`, so one dispatcher can serve any number of concurrent calls.
pub struct JsonRpcDispatcher {
    handlers: HashMap<String, Arc<dyn JsonRpcHandler>>,
    expose_internal_errors: bool,
}

impl JsonRpcDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            expose_internal_errors: false,
        }
    }

    /// Attach failure detail to -32603 responses as `data: {"detail": ...}`.
    /// Off by default; internal messages then never reach the caller.
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Register a handler for a specific method.
    pub fn register_method<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: JsonRpcHandler + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(handler));
    }

    /// Register one handler instance for multiple methods.
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: JsonRpcHandler + 'static,
    {
        let handler = Arc::new(handler);
        for method in methods {
            self.handlers.insert(method, handler.clone());
        }
    }

    pub fn contains_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// All registered method names.
    pub fn registered_methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Process one request and produce its reply.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let Some(handler) = self.handlers.get(&request.method) else {
            debug!("Method not found");
            return JsonRpcMessage::error(JsonRpcError::method_not_found(
                request.id,
                &request.method,
            ));
        };

        let outcome = AssertUnwindSafe(handler.handle(&request.method, request.params))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => JsonRpcMessage::success(request.id, result.into()),
            Ok(Err(failure)) => {
                match &failure {
                    MethodError::Internal(detail) => {
                        error!("Method '{}' failed: {}", request.method, detail)
                    }
                    expected => debug!("Method '{}' rejected the call: {}", request.method, expected),
                }
                JsonRpcMessage::error(JsonRpcError::new(
                    Some(request.id),
                    failure.into_error_object(self.expose_internal_errors),
                ))
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!("Method '{}' panicked: {}", request.method, detail);
                JsonRpcMessage::error(JsonRpcError::new(
                    Some(request.id),
                    MethodError::Internal(detail).into_error_object(self.expose_internal_errors),
                ))
            }
        }
    }

    /// Process one notification. The method runs for its side effects; the
    /// outcome is dropped here, success or not, and failures only get logged.
    #[instrument(skip(self, notification), fields(method = %notification.method))]
    pub async fn handle_notification(&self, notification: JsonRpcNotification) {
        let Some(handler) = self.handlers.get(&notification.method) else {
            debug!("Ignoring notification for unregistered method");
            return;
        };

        let outcome = AssertUnwindSafe(handler.handle(&notification.method, notification.params))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(failure)) => {
                error!("Notification '{}' failed: {}", notification.method, failure)
            }
            Err(panic) => error!(
                "Notification '{}' panicked: {}",
                notification.method,
                panic_message(panic.as_ref())
            ),
        }
    }

    /// Process a decoded payload, batch or single.
    ///
    /// Batch items are dispatched as concurrently polled futures; `join_all`
    /// keeps replies in submission order, so responses line up with their
    /// batch positions regardless of completion order. `None` means there is
    /// nothing to send back.
    pub async fn handle_payload(&self, payload: InboundPayload) -> Option<OutboundPayload> {
        match payload {
            InboundPayload::Single(item) => OutboundPayload::from_reply(self.handle_item(item).await),
            InboundPayload::Batch(items) => {
                let replies = join_all(items.into_iter().map(|item| self.handle_item(item))).await;
                OutboundPayload::from_replies(replies)
            }
        }
    }

    async fn handle_item(&self, item: InboundItem) -> Option<JsonRpcMessage> {
        match item {
            InboundItem::Request(request) => Some(self.handle_request(request).await),
            InboundItem::Notification(notification) => {
                self.handle_notification(notification).await;
                None
            }
            InboundItem::Invalid(error) => Some(JsonRpcMessage::Error(error)),
        }
    }
}

impl Default for JsonRpcDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
