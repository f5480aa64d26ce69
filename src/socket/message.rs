//! Frame Module
//!
//! The wire envelope exchanged with the realtime endpoint: an event name and
//! a JSON payload. Payload shapes are a contract between client and server
//! and are opaque here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// == Frame ==
/// One realtime message: named event plus arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Event name, e.g. `physics_update` or `cursor_moved`
    pub event: String,
    /// Event payload, opaque JSON
    #[serde(default)]
    pub payload: Value,
}

impl Frame {
    /// Creates a frame for the given event and payload.
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Serializes the frame to its JSON text form.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a frame from JSON text.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_encode() {
        let frame = Frame::new("cursor_moved", json!({ "x": 3, "y": 7 }));
        let text = frame.encode().unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["event"], "cursor_moved");
        assert_eq!(value["payload"]["x"], 3);
    }

    #[test]
    fn test_frame_decode() {
        let frame = Frame::decode(r#"{"event":"physics_update","payload":{"gravity":9.81}}"#)
            .unwrap();

        assert_eq!(frame.event, "physics_update");
        assert_eq!(frame.payload["gravity"], 9.81);
    }

    #[test]
    fn test_frame_decode_missing_payload_defaults_to_null() {
        let frame = Frame::decode(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(frame.event, "ping");
        assert_eq!(frame.payload, Value::Null);
    }

    #[test]
    fn test_frame_decode_rejects_garbage() {
        assert!(Frame::decode("not json").is_err());
        assert!(Frame::decode(r#"{"payload":{}}"#).is_err());
    }
}
