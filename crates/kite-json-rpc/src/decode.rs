//! Inbound payload decoding and validation.
//!
//! Raw text goes in, classified messages come out. Syntax failures and
//! whole-payload shape violations surface as a ready-to-send [`JsonRpcError`];
//! defects inside an individual message (bad version, missing method, bad
//! params or id type) are confined to that message so the rest of a batch
//! still dispatches.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::JsonRpcError;
use crate::notification::JsonRpcNotification;
use crate::request::{JsonRpcRequest, RequestParams};
use crate::types::RequestId;

/// One decoded inbound message.
#[derive(Debug, Clone)]
pub enum InboundItem {
    /// A call expecting a response.
    Request(JsonRpcRequest),
    /// A call expecting no response.
    Notification(JsonRpcNotification),
    /// A structurally invalid entry, already shaped as the error response it
    /// will be answered with.
    Invalid(JsonRpcError),
}

/// A decoded payload: a lone message or a batch of them.
#[derive(Debug, Clone)]
pub enum InboundPayload {
    Single(InboundItem),
    Batch(Vec<InboundItem>),
}

/// Decode one raw JSON-RPC payload.
///
/// `Err` means the payload as a whole cannot be processed: unparseable text
/// (-32700), an empty batch, or a top-level value that is neither object nor
/// array (-32600). The error carries `id: null` since no id was recoverable.
pub fn parse_json_rpc_payload(raw: &str) -> Result<InboundPayload, JsonRpcError> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Rejecting unparseable payload: {}", e);
            return Err(JsonRpcError::parse_error());
        }
    };

    match value {
        Value::Array(entries) => {
            if entries.is_empty() {
                debug!("Rejecting empty batch");
                return Err(JsonRpcError::invalid_request(None));
            }
            let items = entries.into_iter().map(classify_entry).collect();
            Ok(InboundPayload::Batch(items))
        }
        Value::Object(_) => Ok(InboundPayload::Single(classify_entry(value))),
        other => {
            debug!("Rejecting non-object top level: {}", other);
            Err(JsonRpcError::invalid_request(None))
        }
    }
}

/// Validate one candidate request object.
///
/// The id is extracted first so later violations still echo it; an id of
/// unacceptable type (null, fractional number, object, array) voids the whole
/// entry and the error is reported with `id: null`.
fn classify_entry(entry: Value) -> InboundItem {
    let mut entry = match entry {
        Value::Object(map) => map,
        _ => return InboundItem::Invalid(JsonRpcError::invalid_request(None)),
    };

    let id = match entry.remove("id") {
        None => None,
        Some(value) => match RequestId::from_value(&value) {
            Some(id) => Some(id),
            None => return InboundItem::Invalid(JsonRpcError::invalid_request(None)),
        },
    };

    if !version_is_current(&entry) {
        return InboundItem::Invalid(JsonRpcError::invalid_request(id));
    }

    let method = match entry.remove("method") {
        Some(Value::String(name)) => name,
        _ => return InboundItem::Invalid(JsonRpcError::invalid_request(id)),
    };

    let params = match entry.remove("params") {
        None => None,
        Some(Value::Array(items)) => Some(RequestParams::Array(items)),
        Some(Value::Object(named)) => {
            Some(RequestParams::Object(named.into_iter().collect()))
        }
        Some(_) => return InboundItem::Invalid(JsonRpcError::invalid_request(id)),
    };

    // Unknown extra members are tolerated and dropped.
    match id {
        Some(id) => InboundItem::Request(JsonRpcRequest::new(id, method, params)),
        None => InboundItem::Notification(JsonRpcNotification::new(method, params)),
    }
}

fn version_is_current(entry: &Map<String, Value>) -> bool {
    matches!(entry.get("jsonrpc"), Some(Value::String(v)) if v == crate::JSONRPC_VERSION)
}
