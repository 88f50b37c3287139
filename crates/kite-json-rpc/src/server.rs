//! One-call entry point: raw text in, optional reply text out.

use tracing::debug;

use crate::decode::parse_json_rpc_payload;
use crate::dispatch::JsonRpcDispatcher;
use crate::encode::OutboundPayload;
use crate::response::JsonRpcMessage;

/// Transport-facing JSON-RPC server core.
///
/// Owns a dispatcher and drives the full decode, dispatch, encode cycle for
/// each raw payload. Transports pass request text exactly as received and
/// send back the returned string verbatim; `None` means the payload was all
/// notifications and nothing goes back.
pub struct JsonRpcServer {
    dispatcher: JsonRpcDispatcher,
}

impl JsonRpcServer {
    pub fn new(dispatcher: JsonRpcDispatcher) -> Self {
        Self { dispatcher }
    }

    /// The dispatcher serving this server.
    pub fn dispatcher(&self) -> &JsonRpcDispatcher {
        &self.dispatcher
    }

    /// Handle one raw inbound payload, single or batch.
    pub async fn handle_request(&self, raw: &str) -> Option<String> {
        debug!(bytes = raw.len(), "Handling inbound payload");

        let payload = match parse_json_rpc_payload(raw) {
            Ok(payload) => payload,
            Err(error) => {
                return Some(OutboundPayload::Single(JsonRpcMessage::Error(error)).to_json());
            }
        };

        let outbound = self.dispatcher.handle_payload(payload).await?;
        Some(outbound.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::FunctionHandler;
    use crate::request::RequestParams;
    use futures::FutureExt;
    use serde_json::{Value, json};

    fn server() -> JsonRpcServer {
        let mut dispatcher = JsonRpcDispatcher::new();
        dispatcher.register_method(
            "ping",
            FunctionHandler::new(|_method: &str, _params: Option<RequestParams>| {
                async { Ok(json!("pong")) }.boxed()
            }),
        );
        JsonRpcServer::new(dispatcher)
    }

    #[tokio::test]
    async fn test_single_call_round_trip() {
        let server = server();
        let reply = server
            .handle_request(r#"{"jsonrpc": "2.0", "id": 1, "method": "ping"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value, json!({ "jsonrpc": "2.0", "id": 1, "result": "pong" }));
    }

    #[tokio::test]
    async fn test_malformed_payload_gets_parse_error() {
        let server = server();
        let reply = server.handle_request("{not json").await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], json!(-32700));
        assert_eq!(value["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = server();
        let reply = server
            .handle_request(r#"{"jsonrpc": "2.0", "method": "ping"}"#)
            .await;
        assert!(reply.is_none());
    }
}
