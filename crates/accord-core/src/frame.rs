//! Raw gateway frame envelope.
//!
//! The gateway wire contract is a fixed external format this library
//! consumes, not one it owns: every frame is a JSON object
//! `{"op": <int>, "t": <string|null>, "d": <payload>}`.

use serde::{Deserialize, Serialize};

/// Opcode for dispatch frames carrying a typed event.
pub const OP_DISPATCH: i64 = 0;

/// A raw inbound gateway frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayFrame {
    /// Frame opcode.
    pub op: i64,

    /// Event type tag, present only on dispatch frames.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    /// Event payload.
    #[serde(rename = "d", default)]
    pub data: serde_json::Value,
}

impl GatewayFrame {
    /// Create a dispatch frame with the given type tag and payload.
    pub fn dispatch(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            op: OP_DISPATCH,
            event_type: Some(event_type.into()),
            data,
        }
    }

    /// Whether this frame carries a typed event.
    pub fn is_dispatch(&self) -> bool {
        self.op == OP_DISPATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dispatch_frame() {
        let frame: GatewayFrame =
            serde_json::from_str(r#"{"op":0,"t":"MESSAGE_CREATE","d":{"id":"1"}}"#).unwrap();
        assert!(frame.is_dispatch());
        assert_eq!(frame.event_type.as_deref(), Some("MESSAGE_CREATE"));
        assert_eq!(frame.data["id"], "1");
    }

    #[test]
    fn parses_frame_without_type_tag() {
        let frame: GatewayFrame = serde_json::from_str(r#"{"op":11}"#).unwrap();
        assert!(!frame.is_dispatch());
        assert!(frame.event_type.is_none());
        assert!(frame.data.is_null());
    }

    #[test]
    fn dispatch_constructor_round_trips() {
        let frame = GatewayFrame::dispatch("READY", json!({"user": {"id": "42"}}));
        let text = serde_json::to_string(&frame).unwrap();
        let parsed: GatewayFrame = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.event_type.as_deref(), Some("READY"));
        assert_eq!(parsed.data["user"]["id"], "42");
    }
}
