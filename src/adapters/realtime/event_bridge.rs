//! Bridge between the event bus and session observer rooms.
//!
//! Subscribes to the session and request lifecycle events and rebroadcasts
//! each one into the matching session room, so observers see changes the
//! moment the command that caused them commits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope, SessionId};
use crate::ports::{EventHandler, EventSubscriber};

use super::hub::SessionChangeHub;
use super::messages::{ChangeKind, SessionChange};

/// Event types observers are told about.
pub const REALTIME_EVENT_TYPES: &[&str] = &[
    "session.created.v1",
    "session.cancelled.v1",
    "session.completed.v1",
    "request.submitted.v1",
    "request.accepted.v1",
    "request.declined.v1",
    "request.withdrawn.v1",
];

/// Bridge implementing `EventHandler` over the hub.
pub struct SessionChangeBridge {
    hub: Arc<SessionChangeHub>,
}

impl SessionChangeBridge {
    /// Create a new bridge over the given hub.
    pub fn new(hub: Arc<SessionChangeHub>) -> Self {
        Self { hub }
    }

    /// Create as an Arc (for sharing with the event subscriber).
    pub fn new_shared(hub: Arc<SessionChangeHub>) -> Arc<Self> {
        Arc::new(Self::new(hub))
    }

    /// Register this bridge with an event subscriber.
    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(REALTIME_EVENT_TYPES, self.clone());
    }

    /// Transform an envelope into a broadcastable change.
    ///
    /// Returns `None` for event types observers don't care about.
    fn transform(&self, event: &EventEnvelope) -> Option<SessionChange> {
        let change = match event.event_type.as_str() {
            "session.created.v1" => ChangeKind::SessionCreated,
            "session.cancelled.v1" => ChangeKind::SessionCancelled,
            "session.completed.v1" => ChangeKind::SessionCompleted,
            "request.submitted.v1" => ChangeKind::RequestSubmitted,
            "request.accepted.v1" => ChangeKind::RequestAccepted,
            "request.declined.v1" => ChangeKind::RequestDeclined,
            "request.withdrawn.v1" => ChangeKind::RequestWithdrawn,
            _ => return None,
        };

        Some(SessionChange {
            change,
            data: event.payload.clone(),
            occurred_at: event.occurred_at,
            correlation_id: event.metadata.correlation_id.clone(),
        })
    }

    /// Resolve the session ID an envelope should be routed to.
    ///
    /// Session events carry the session ID as the aggregate ID; request
    /// events carry it in the payload.
    fn resolve_session_id(&self, event: &EventEnvelope) -> Option<SessionId> {
        if event.aggregate_type == "Session" {
            return event.aggregate_id.parse().ok();
        }

        event
            .payload
            .get("session_id")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }
}

#[async_trait]
impl EventHandler for SessionChangeBridge {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let Some(change) = self.transform(&event) else {
            return Ok(());
        };

        let Some(session_id) = self.resolve_session_id(&event) else {
            tracing::debug!(
                event_type = %event.event_type,
                aggregate_type = %event.aggregate_type,
                aggregate_id = %event.aggregate_id,
                "Cannot resolve session ID for event, skipping broadcast"
            );
            return Ok(());
        };

        self.hub.broadcast(&session_id, change).await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "SessionChangeBridge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::realtime::hub::ObserverId;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};
    use serde_json::json;

    fn session_event(event_type: &str, session_id: &SessionId) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            schema_version: 1,
            aggregate_id: session_id.to_string(),
            aggregate_type: "Session".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({
                "session_id": session_id.to_string(),
                "title": "Morning rally"
            }),
            metadata: EventMetadata::default(),
        }
    }

    fn request_event(event_type: &str, session_id: &SessionId) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            schema_version: 1,
            aggregate_id: "1c0c6f48-3b0a-4a58-9a05-2d1f6f7a9f00".to_string(),
            aggregate_type: "MatchRequest".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({
                "request_id": "1c0c6f48-3b0a-4a58-9a05-2d1f6f7a9f00",
                "session_id": session_id.to_string()
            }),
            metadata: EventMetadata::default(),
        }
    }

    #[test]
    fn transform_maps_all_lifecycle_events() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));
        let session_id = SessionId::new();

        let cases = [
            ("session.created.v1", ChangeKind::SessionCreated),
            ("session.cancelled.v1", ChangeKind::SessionCancelled),
            ("session.completed.v1", ChangeKind::SessionCompleted),
            ("request.submitted.v1", ChangeKind::RequestSubmitted),
            ("request.accepted.v1", ChangeKind::RequestAccepted),
            ("request.declined.v1", ChangeKind::RequestDeclined),
            ("request.withdrawn.v1", ChangeKind::RequestWithdrawn),
        ];

        for (event_type, expected) in cases {
            let change = bridge
                .transform(&session_event(event_type, &session_id))
                .unwrap();
            assert_eq!(change.change, expected, "event type {}", event_type);
        }
    }

    #[test]
    fn transform_ignores_unknown_events() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));
        let event = session_event("profile.updated.v1", &SessionId::new());
        assert!(bridge.transform(&event).is_none());
    }

    #[test]
    fn resolve_session_id_from_session_aggregate() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));
        let session_id = SessionId::new();

        let resolved = bridge.resolve_session_id(&session_event("session.created.v1", &session_id));
        assert_eq!(resolved, Some(session_id));
    }

    #[test]
    fn resolve_session_id_from_request_payload() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));
        let session_id = SessionId::new();

        let resolved =
            bridge.resolve_session_id(&request_event("request.submitted.v1", &session_id));
        assert_eq!(resolved, Some(session_id));
    }

    #[test]
    fn resolve_session_id_missing_from_payload_returns_none() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));

        let event = EventEnvelope {
            event_id: EventId::new(),
            event_type: "request.submitted.v1".to_string(),
            schema_version: 1,
            aggregate_id: "req-1".to_string(),
            aggregate_type: "MatchRequest".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({"request_id": "req-1"}),
            metadata: EventMetadata::default(),
        };

        assert!(bridge.resolve_session_id(&event).is_none());
    }

    #[tokio::test]
    async fn handle_broadcasts_to_the_session_room() {
        let hub = Arc::new(SessionChangeHub::default());
        let bridge = SessionChangeBridge::new(hub.clone());
        let session_id = SessionId::new();

        let mut rx = hub.join(&session_id, ObserverId::new()).await;

        bridge
            .handle(request_event("request.accepted.v1", &session_id))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.change, ChangeKind::RequestAccepted);
        assert_eq!(change.data["session_id"], session_id.to_string());
    }

    #[tokio::test]
    async fn handle_skips_irrelevant_events_without_error() {
        let bridge = SessionChangeBridge::new(Arc::new(SessionChangeHub::default()));

        let result = bridge
            .handle(session_event("internal.cleanup", &SessionId::new()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn register_subscribes_to_every_lifecycle_event() {
        use crate::adapters::events::InMemoryEventBus;
        use crate::adapters::realtime::messages::ChangeKind;

        let hub = Arc::new(SessionChangeHub::default());
        let bridge = SessionChangeBridge::new_shared(hub.clone());
        let bus = InMemoryEventBus::new();
        bridge.register(&bus);

        let session_id = SessionId::new();
        let mut rx = hub.join(&session_id, ObserverId::new()).await;

        use crate::ports::EventPublisher;
        bus.publish(session_event("session.cancelled.v1", &session_id))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.change, ChangeKind::SessionCancelled);
    }
}
