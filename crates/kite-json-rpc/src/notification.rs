use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::{request::RequestParams, types::JsonRpcVersion};

/// A JSON-RPC notification: a call with no id, and therefore no response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params,
        }
    }

    /// Create a notification with no parameters.
    pub fn new_no_params(method: impl Into<String>) -> Self {
        Self::new(method, None)
    }

    /// Create a notification with named parameters.
    pub fn new_with_object_params(
        method: impl Into<String>,
        params: HashMap<String, Value>,
    ) -> Self {
        Self::new(method, Some(RequestParams::Object(params)))
    }

    /// Create a notification with positional parameters.
    pub fn new_with_array_params(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self::new(method, Some(RequestParams::Array(params)))
    }

    /// Get a named parameter, if params are an object.
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a positional parameter, if params are an array.
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_notification_round_trip() {
        let notification = JsonRpcNotification::new_no_params("heartbeat");

        let json_str = to_string(&notification).unwrap();
        let parsed: JsonRpcNotification = from_str(&json_str).unwrap();

        assert_eq!(parsed.method, "heartbeat");
        assert!(parsed.params.is_none());
    }

    #[test]
    fn test_notification_has_no_id_on_the_wire() {
        let notification = JsonRpcNotification::new_no_params("heartbeat");
        let json_str = to_string(&notification).unwrap();

        assert!(!json_str.contains("\"id\""));
        assert!(json_str.contains("\"jsonrpc\":\"2.0\""));
        assert!(json_str.contains("\"method\":\"heartbeat\""));
    }

    #[test]
    fn test_notification_named_params_access() {
        let params = HashMap::from([
            ("level".to_string(), json!("info")),
            ("message".to_string(), json!("ready")),
        ]);
        let notification = JsonRpcNotification::new_with_object_params("log", params);

        assert_eq!(notification.get_param("level"), Some(&json!("info")));
        assert_eq!(notification.get_param("message"), Some(&json!("ready")));
        assert_eq!(notification.get_param("absent"), None);
        assert_eq!(notification.get_param_index(0), None);
    }

    #[test]
    fn test_notification_positional_params_access() {
        let notification =
            JsonRpcNotification::new_with_array_params("progress", vec![json!(40), json!(100)]);

        assert_eq!(notification.get_param_index(0), Some(&json!(40)));
        assert_eq!(notification.get_param_index(1), Some(&json!(100)));
        assert_eq!(notification.get_param_index(2), None);
        assert_eq!(notification.get_param("0"), None);
    }
}
