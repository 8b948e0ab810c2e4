//! WebSocket message types: envelope and subscription commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific pairs.
    Subscribe {
        /// Pair keys (`"0x<first>:0x<second>"`). Use `["*"]` for all
        /// events including token creations.
        pairs: Vec<String>,
    },
    /// Unsubscribe from events for specific pairs.
    Unsubscribe {
        /// Pair keys to unsubscribe from. `"*"` clears the wildcard.
        pairs: Vec<String>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_parses() {
        let json = r#"{"command":"subscribe","pairs":["*"]}"#;
        let Ok(cmd) = serde_json::from_str::<WsCommand>(json) else {
            panic!("expected parse to succeed");
        };
        let WsCommand::Subscribe { pairs } = cmd else {
            panic!("expected Subscribe");
        };
        assert_eq!(pairs, vec!["*".to_string()]);
    }

    #[test]
    fn envelope_round_trips() {
        let msg = WsMessage {
            id: "req-1".to_string(),
            msg_type: WsMessageType::Command,
            timestamp: Utc::now(),
            payload: serde_json::json!({"command": "subscribe", "pairs": []}),
        };
        let Ok(json) = serde_json::to_string(&msg) else {
            panic!("serialization failed");
        };
        let Ok(parsed) = serde_json::from_str::<WsMessage>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(parsed.msg_type, WsMessageType::Command);
        assert_eq!(parsed.id, "req-1");
    }
}
