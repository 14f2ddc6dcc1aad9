//! Event envelopes sent to sinks

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Reporter implementation name, sent to backends in `sdk.name` and client headers
pub const CLIENT_NAME: &str = "testinel.rust";

/// Reporter implementation version
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const START_EVENT: &str = "start";
pub const END_EVENT: &str = "end";

/// `<name>/<version>` string used for `User-Agent` and `X-Testinel-Client`
pub fn client_user_agent() -> String {
    format!("{}/{}", CLIENT_NAME, CLIENT_VERSION)
}

/// Identifies the reporter to backends (start event only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    pub name: String,
    pub version: String,
}

impl ClientMetadata {
    pub fn current() -> Self {
        Self {
            name: CLIENT_NAME.to_string(),
            version: CLIENT_VERSION.to_string(),
        }
    }
}

/// One reported event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Run identifier shared by every event of a run
    pub run_id: String,
    /// `start`, `end`, or a caller-defined kind
    pub event: String,
    /// Timestamp (UTC ISO 8601), taken when the envelope is built
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Test descriptors known at start of run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk: Option<ClientMetadata>,
}

impl Envelope {
    fn new(run_id: &str, event: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            event: event.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            payload: None,
            tests: None,
            sdk: None,
        }
    }

    pub fn start(run_id: &str, payload: serde_json::Value, tests: Vec<serde_json::Value>) -> Self {
        Self {
            payload: Some(payload),
            tests: Some(tests),
            sdk: Some(ClientMetadata::current()),
            ..Self::new(run_id, START_EVENT)
        }
    }

    pub fn event(run_id: &str, kind: &str, payload: serde_json::Value) -> Self {
        Self {
            payload: Some(payload),
            ..Self::new(run_id, kind)
        }
    }

    pub fn end(run_id: &str) -> Self {
        Self::new(run_id, END_EVENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_envelope_shape() {
        let envelope = Envelope::start("run-1", json!({"run": 1}), vec![json!({"test_id": "a::b"})]);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["run_id"], "run-1");
        assert_eq!(value["event"], "start");
        assert_eq!(value["payload"], json!({"run": 1}));
        assert_eq!(value["tests"], json!([{"test_id": "a::b"}]));
        assert_eq!(value["sdk"]["name"], CLIENT_NAME);
        assert_eq!(value["sdk"]["version"], CLIENT_VERSION);
    }

    #[test]
    fn test_start_envelope_keeps_empty_tests() {
        let envelope = Envelope::start("run-1", json!({}), Vec::new());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["tests"], json!([]));
    }

    #[test]
    fn test_intermediate_envelope_shape() {
        let envelope = Envelope::event("run-1", "call", json!({"ok": true}));
        let value = serde_json::to_value(&envelope).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(value["event"], "call");
        assert_eq!(value["payload"], json!({"ok": true}));
        assert!(!obj.contains_key("tests"));
        assert!(!obj.contains_key("sdk"));
    }

    #[test]
    fn test_end_envelope_shape() {
        let value = serde_json::to_value(Envelope::end("run-1")).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["event", "run_id", "timestamp"]);
        assert_eq!(value["event"], "end");
    }

    #[test]
    fn test_timestamp_is_utc_rfc3339() {
        let envelope = Envelope::end("run-1");
        let parsed = chrono::DateTime::parse_from_rfc3339(&envelope.timestamp).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_client_user_agent() {
        assert!(client_user_agent().starts_with("testinel.rust/"));
        assert!(!CLIENT_VERSION.is_empty());
    }
}
