//! Simple Calculator JSON-RPC Example
//!
//! This example runs calculator methods (add, subtract, divide) through the
//! full in-memory cycle: raw request text in, reply text out. It covers
//! success, domain errors, protocol errors, notifications, and batches.

use async_trait::async_trait;
use kite_json_rpc::{
    JsonRpcDispatcher, JsonRpcErrorObject, JsonRpcHandler, JsonRpcServer, MethodError,
    MethodResult, RequestParams, ToJsonRpcError,
};
use serde_json::{Value, json};
use thiserror::Error;

/// Arithmetic failures that carry their own JSON-RPC error codes.
#[derive(Debug, Error)]
enum MathError {
    #[error("division by zero")]
    DivisionByZero,
}

impl ToJsonRpcError for MathError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            MathError::DivisionByZero => {
                JsonRpcErrorObject::server_error(-32001, "Division by zero", None)
            }
        }
    }
}

/// Calculator handler that implements basic arithmetic operations
struct CalculatorHandler;

impl CalculatorHandler {
    fn operand(params: &RequestParams, name: &str) -> MethodResult<f64> {
        params.get(name).and_then(|v| v.as_f64()).ok_or_else(|| {
            MethodError::invalid_params(format!(
                "Parameter '{}' is required and must be a number",
                name
            ))
        })
    }
}

#[async_trait]
impl JsonRpcHandler for CalculatorHandler {
    async fn handle(&self, method: &str, params: Option<RequestParams>) -> MethodResult<Value> {
        let params = params
            .ok_or_else(|| MethodError::invalid_params("Missing parameters"))?;
        let a = Self::operand(&params, "a")?;
        let b = Self::operand(&params, "b")?;

        match method {
            "add" => Ok(json!({ "result": a + b })),
            "subtract" => Ok(json!({ "result": a - b })),
            "divide" => {
                if b == 0.0 {
                    return Err(MathError::DivisionByZero.into());
                }
                Ok(json!({ "result": a / b }))
            }
            other => Err(MethodError::internal(format!("unrouted method {other}"))),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        vec![
            "add".to_string(),
            "subtract".to_string(),
            "divide".to_string(),
        ]
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🧮 Simple Calculator JSON-RPC Server Example");
    println!("=============================================");

    let mut dispatcher = JsonRpcDispatcher::new();
    let handler = CalculatorHandler;
    dispatcher.register_methods(handler.supported_methods(), handler);
    let server = JsonRpcServer::new(dispatcher);

    let test_payloads = vec![
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"a": 10, "b": 4}, "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "divide", "params": {"a": 1, "b": 0}, "id": 3}"#, // Domain error
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": {"a": 2, "b": 3}, "id": 4}"#, // Method not found
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": "invalid", "b": 5}, "id": 5}"#, // Invalid params
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 2}}"#, // Notification
        r#"[{"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 2}, "id": 6}, {"jsonrpc": "2.0", "method": "divide", "params": {"a": 9, "b": 3}, "id": 7}]"#,
        r#"{not json"#, // Parse error
    ];

    for (i, payload) in test_payloads.iter().enumerate() {
        println!("\n--- Test {} ---", i + 1);
        println!("Request:  {}", payload);

        match server.handle_request(payload).await {
            Some(reply) => println!("Response: {}", reply),
            None => println!("Response: (none, notification)"),
        }
    }

    println!("\n🎉 Calculator example completed!");
}
