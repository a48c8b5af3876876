//! Wire protocol between the server and session observers.
//!
//! Server → Observer: connection confirmation, session changes, errors.
//! Observer → Server: pings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

// ============================================
// Server → Observer Messages
// ============================================

/// All message types that can be sent from server to observer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established and joined to the session room.
    Connected(ConnectedMessage),

    /// Something about the session changed.
    #[serde(rename = "session.change")]
    SessionChange(SessionChangeMessage),

    /// Error occurred.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when an observer successfully joins a session room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub session_id: String,
    pub observer_id: String,
    pub timestamp: String,
}

/// Session change notification with the originating event payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChangeMessage {
    pub change: ChangeKind,
    pub data: serde_json::Value,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// The kinds of change an observer can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Session opened.
    SessionCreated,
    /// Session cancelled by its creator.
    SessionCancelled,
    /// Session reached its scheduled end or was closed out.
    SessionCompleted,
    /// A new join request arrived.
    RequestSubmitted,
    /// A request was accepted; the payload says whether the session filled.
    RequestAccepted,
    /// A request was declined.
    RequestDeclined,
    /// A request was withdrawn; the payload says whether the session reopened.
    RequestWithdrawn,
}

/// Error message sent to an observer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Observer → Server Messages
// ============================================

/// Messages an observer may send to the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserverMessage {
    /// Heartbeat.
    Ping,
}

// ============================================
// Broadcast payload
// ============================================

/// The unit broadcast through a session room.
///
/// Carried on the hub's channels and converted to a [`ServerMessage`]
/// at the socket boundary.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub change: ChangeKind,
    pub data: serde_json::Value,
    pub occurred_at: Timestamp,
    pub correlation_id: Option<String>,
}

impl SessionChange {
    /// Convert to the outbound wire message.
    pub fn to_server_message(&self) -> ServerMessage {
        ServerMessage::SessionChange(SessionChangeMessage {
            change: self.change,
            data: self.data.clone(),
            timestamp: self.occurred_at.as_datetime().to_rfc3339(),
            correlation_id: self.correlation_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_change_message_serializes_with_type_tag() {
        let change = SessionChange {
            change: ChangeKind::RequestAccepted,
            data: json!({"session_became_full": true}),
            occurred_at: Timestamp::now(),
            correlation_id: Some("corr-1".to_string()),
        };

        let msg = change.to_server_message();
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "session.change");
        assert_eq!(value["change"], "request_accepted");
        assert_eq!(value["data"]["session_became_full"], true);
        assert_eq!(value["correlationId"], "corr-1");
    }

    #[test]
    fn correlation_id_is_omitted_when_absent() {
        let change = SessionChange {
            change: ChangeKind::SessionCancelled,
            data: json!({}),
            occurred_at: Timestamp::now(),
            correlation_id: None,
        };

        let value = serde_json::to_value(change.to_server_message()).unwrap();
        assert!(value.get("correlationId").is_none());
    }

    #[test]
    fn observer_ping_deserializes() {
        let msg: ObserverMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ObserverMessage::Ping));
    }
}
