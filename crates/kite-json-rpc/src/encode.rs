//! Outbound reply encoding.
//!
//! Collects per-item replies into the final wire payload. Notifications
//! contribute nothing, so a batch of replies shrinks to only the answered
//! positions, and a payload with no replies at all encodes to nothing.

use serde::Serialize;
use tracing::error;

use crate::response::JsonRpcMessage;

/// Emitted if encoding itself fails, so the caller always gets valid JSON.
const ENCODE_FAILURE_REPLY: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// A fully shaped outbound payload: one reply, or an ordered batch of them.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

impl OutboundPayload {
    /// Wrap the reply to a single message. `None` in means `None` out: a
    /// lone notification produces no payload.
    pub fn from_reply(reply: Option<JsonRpcMessage>) -> Option<Self> {
        reply.map(OutboundPayload::Single)
    }

    /// Collect per-item batch replies, dropping the `None` slots left by
    /// notifications while keeping the rest in order. A batch that was all
    /// notifications yields `None` rather than an empty array.
    pub fn from_replies(replies: Vec<Option<JsonRpcMessage>>) -> Option<Self> {
        let replies: Vec<JsonRpcMessage> = replies.into_iter().flatten().collect();
        if replies.is_empty() {
            None
        } else {
            Some(OutboundPayload::Batch(replies))
        }
    }

    /// Encode to the wire string.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => {
                error!("Failed to encode outbound payload: {}", err);
                ENCODE_FAILURE_REPLY.to_string()
            }
        }
    }
}
