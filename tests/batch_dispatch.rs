//! Batch handling: ordering, mixed validity, concurrency, and the
//! notification/empty-batch special cases, all driven through raw text.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use kite_json_rpc::{
    FunctionHandler, JsonRpcDispatcher, JsonRpcHandler, JsonRpcServer, MethodError, MethodResult,
    RequestParams,
};
use serde_json::{Value, json};

struct BatchFixture {
    hellos: Arc<AtomicUsize>,
}

#[async_trait]
impl JsonRpcHandler for BatchFixture {
    async fn handle(&self, method: &str, params: Option<RequestParams>) -> MethodResult<Value> {
        match method {
            "sum" => {
                let Some(RequestParams::Array(values)) = params else {
                    return Err(MethodError::invalid_params("positional params required"));
                };
                let mut total = 0;
                for value in &values {
                    total += value
                        .as_i64()
                        .ok_or_else(|| MethodError::invalid_params("integers required"))?;
                }
                Ok(json!(total))
            }
            "subtract" => {
                let params =
                    params.ok_or_else(|| MethodError::invalid_params("params required"))?;
                let a = params.get_index(0).and_then(|v| v.as_i64());
                let b = params.get_index(1).and_then(|v| v.as_i64());
                match (a, b) {
                    (Some(a), Some(b)) => Ok(json!(a - b)),
                    _ => Err(MethodError::invalid_params("two integers required")),
                }
            }
            "get_data" => Ok(json!(["hello", 5])),
            "notify_hello" => {
                self.hellos.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
            "sleep" => {
                let tag = params
                    .as_ref()
                    .and_then(|p| p.get_index(0))
                    .cloned()
                    .unwrap_or(Value::Null);
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(tag)
            }
            "explode" => panic!("wires crossed"),
            other => Err(MethodError::internal(format!("unrouted method {other}"))),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        [
            "sum",
            "subtract",
            "get_data",
            "notify_hello",
            "sleep",
            "explode",
        ]
        .iter()
        .map(|m| m.to_string())
        .collect()
    }
}

fn server() -> (JsonRpcServer, Arc<AtomicUsize>) {
    let hellos = Arc::new(AtomicUsize::new(0));
    let fixture = BatchFixture {
        hellos: hellos.clone(),
    };
    let mut dispatcher = JsonRpcDispatcher::new();
    dispatcher.register_methods(fixture.supported_methods(), fixture);
    (JsonRpcServer::new(dispatcher), hellos)
}

async fn reply_value(server: &JsonRpcServer, raw: &str) -> Value {
    let reply = server.handle_request(raw).await.expect("reply expected");
    serde_json::from_str(&reply).expect("reply must be valid JSON")
}

#[tokio::test]
async fn test_mixed_batch_keeps_order_and_skips_notifications() {
    let (server, hellos) = server();
    let value = reply_value(
        &server,
        r#"[
            {"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 4], "id": "1"},
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
            {"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": "2"},
            {"foo": "boo"},
            {"jsonrpc": "2.0", "method": "foo.get", "params": {"name": "myself"}, "id": "5"},
            {"jsonrpc": "2.0", "method": "get_data", "id": "9"}
        ]"#,
    )
    .await;

    assert_eq!(
        value,
        json!([
            { "jsonrpc": "2.0", "id": "1", "result": 7 },
            { "jsonrpc": "2.0", "id": "2", "result": 19 },
            { "jsonrpc": "2.0", "id": null, "error": { "code": -32600, "message": "Invalid Request" } },
            { "jsonrpc": "2.0", "id": "5", "error": { "code": -32601, "message": "Method 'foo.get' not found" } },
            { "jsonrpc": "2.0", "id": "9", "result": ["hello", 5] },
        ])
    );
    assert_eq!(hellos.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_all_notification_batch_produces_nothing() {
    let (server, hellos) = server();
    let reply = server
        .handle_request(
            r#"[
                {"jsonrpc": "2.0", "method": "notify_hello"},
                {"jsonrpc": "2.0", "method": "notify_hello"}
            ]"#,
        )
        .await;

    assert!(reply.is_none());
    assert_eq!(hellos.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_batch_is_rejected_with_a_single_error() {
    let (server, _) = server();
    let value = reply_value(&server, "[]").await;

    assert!(value.is_object(), "reply must not be an array: {value}");
    assert_eq!(value["error"]["code"], json!(-32600));
    assert_eq!(value["id"], Value::Null);
}

#[tokio::test]
async fn test_batch_of_invalid_entries_gets_one_error_each() {
    let (server, _) = server();

    let value = reply_value(&server, "[1]").await;
    assert_eq!(
        value,
        json!([
            { "jsonrpc": "2.0", "id": null, "error": { "code": -32600, "message": "Invalid Request" } },
        ])
    );

    let value = reply_value(&server, "[1, 2, 3]").await;
    let entries = value.as_array().expect("batch reply must be an array");
    assert_eq!(entries.len(), 3);
    for entry in entries {
        assert_eq!(entry["error"]["code"], json!(-32600));
        assert_eq!(entry["id"], Value::Null);
    }
}

#[tokio::test]
async fn test_single_call_reply_is_not_an_array() {
    let (server, _) = server();
    let value = reply_value(
        &server,
        r#"{"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 4], "id": 1}"#,
    )
    .await;

    assert!(value.is_object());
    assert_eq!(value["result"], json!(7));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_batch_items_are_polled_concurrently() {
    let (server, _) = server();
    let started = tokio::time::Instant::now();
    let reply = server
        .handle_request(
            r#"[
                {"jsonrpc": "2.0", "method": "sleep", "params": ["first"], "id": 1},
                {"jsonrpc": "2.0", "method": "sleep", "params": ["second"], "id": 2}
            ]"#,
        )
        .await
        .expect("reply expected");
    let elapsed = started.elapsed();

    // Two 100ms waits overlap instead of running back to back.
    assert!(elapsed < Duration::from_millis(150), "elapsed: {elapsed:?}");

    let value: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(
        value,
        json!([
            { "jsonrpc": "2.0", "id": 1, "result": "first" },
            { "jsonrpc": "2.0", "id": 2, "result": "second" },
        ])
    );
}

#[tokio::test]
async fn test_panicking_item_does_not_poison_siblings() {
    let (server, _) = server();
    let value = reply_value(
        &server,
        r#"[
            {"jsonrpc": "2.0", "method": "sum", "params": [1, 1], "id": 1},
            {"jsonrpc": "2.0", "method": "explode", "id": 2},
            {"jsonrpc": "2.0", "method": "sum", "params": [2, 2], "id": 3}
        ]"#,
    )
    .await;

    assert_eq!(value[0], json!({ "jsonrpc": "2.0", "id": 1, "result": 2 }));
    assert_eq!(value[1]["error"]["code"], json!(-32603));
    assert_eq!(value[1]["id"], json!(2));
    assert_eq!(value[2], json!({ "jsonrpc": "2.0", "id": 3, "result": 4 }));
}

#[tokio::test]
async fn test_batch_spans_handlers_registered_separately() {
    let (server, _) = {
        let hellos = Arc::new(AtomicUsize::new(0));
        let fixture = BatchFixture {
            hellos: hellos.clone(),
        };
        let mut dispatcher = JsonRpcDispatcher::new();
        dispatcher.register_methods(fixture.supported_methods(), fixture);
        dispatcher.register_method(
            "version",
            FunctionHandler::new(|_method: &str, _params: Option<RequestParams>| {
                async { Ok(json!("0.2.3")) }.boxed()
            }),
        );
        (JsonRpcServer::new(dispatcher), hellos)
    };

    let value = reply_value(
        &server,
        r#"[
            {"jsonrpc": "2.0", "method": "version", "id": 1},
            {"jsonrpc": "2.0", "method": "sum", "params": [3, 4], "id": 2}
        ]"#,
    )
    .await;

    assert_eq!(
        value,
        json!([
            { "jsonrpc": "2.0", "id": 1, "result": "0.2.3" },
            { "jsonrpc": "2.0", "id": 2, "result": 7 },
        ])
    );
}
