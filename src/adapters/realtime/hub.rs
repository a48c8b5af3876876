//! Room management for session-scoped change broadcasts.
//!
//! Rooms are keyed by session ID; broadcasting a change for a session
//! reaches exactly the observers joined to that session's room.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::foundation::SessionId;

use super::messages::SessionChange;

/// Unique identifier for a connected observer.
///
/// Generated server-side when a connection is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Create a new random observer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manages observer rooms organized by session.
///
/// Provides join/leave, broadcast to a session's room, and automatic
/// cleanup of empty rooms.
///
/// # Thread Safety
///
/// Uses `RwLock` for the room registry since broadcasts (reads) vastly
/// outnumber joins and leaves (writes).
pub struct SessionChangeHub {
    /// Map of session_id → broadcast sender for that room.
    rooms: RwLock<HashMap<SessionId, broadcast::Sender<SessionChange>>>,

    /// Map of observer_id → session_id for O(1) cleanup on disconnect.
    observer_sessions: RwLock<HashMap<ObserverId, SessionId>>,

    /// Channel capacity for each room's broadcast channel.
    channel_capacity: usize,
}

impl SessionChangeHub {
    /// Create a new hub with the given per-room channel capacity.
    ///
    /// Larger capacities absorb bursts better but use more memory; the
    /// change rate per session is low, so the default is plenty.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            observer_sessions: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Create with default capacity (128 messages).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Join an observer to a session room.
    ///
    /// The room is created on first join. Returns a receiver carrying
    /// every change broadcast for that session.
    pub async fn join(
        &self,
        session_id: &SessionId,
        observer_id: ObserverId,
    ) -> broadcast::Receiver<SessionChange> {
        let mut rooms = self.rooms.write().await;

        let sender = rooms.entry(*session_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.observer_sessions
            .write()
            .await
            .insert(observer_id, *session_id);

        sender.subscribe()
    }

    /// Remove an observer from their session room.
    ///
    /// If the room becomes empty it is dropped.
    pub async fn leave(&self, observer_id: &ObserverId) {
        let mut observer_sessions = self.observer_sessions.write().await;

        if let Some(session_id) = observer_sessions.remove(observer_id) {
            let rooms = self.rooms.read().await;
            if let Some(sender) = rooms.get(&session_id) {
                if sender.receiver_count() == 0 {
                    drop(rooms);
                    self.rooms.write().await.remove(&session_id);
                }
            }
        }
    }

    /// Broadcast a change to all observers in a session room.
    ///
    /// A no-op when nobody is watching the session. Slow observers that
    /// let the channel buffer fill will miss the oldest changes.
    pub async fn broadcast(&self, session_id: &SessionId, change: SessionChange) {
        let rooms = self.rooms.read().await;

        if let Some(sender) = rooms.get(session_id) {
            // No receivers is fine
            let _ = sender.send(change);
        }
    }

    /// Number of observers currently in a session's room.
    pub async fn observer_count(&self, session_id: &SessionId) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(session_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// All sessions that currently have observers (for monitoring).
    pub async fn active_rooms(&self) -> Vec<SessionId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Total observers across all rooms.
    pub async fn total_observer_count(&self) -> usize {
        self.rooms
            .read()
            .await
            .values()
            .map(|s| s.receiver_count())
            .sum()
    }
}

impl Default for SessionChangeHub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::realtime::messages::ChangeKind;
    use crate::domain::foundation::Timestamp;
    use serde_json::json;

    fn change(kind: ChangeKind) -> SessionChange {
        SessionChange {
            change: kind,
            data: json!({}),
            occurred_at: Timestamp::now(),
            correlation_id: None,
        }
    }

    #[tokio::test]
    async fn joined_observer_receives_broadcast() {
        let hub = SessionChangeHub::with_default_capacity();
        let session_id = SessionId::new();

        let mut rx = hub.join(&session_id, ObserverId::new()).await;
        hub.broadcast(&session_id, change(ChangeKind::RequestSubmitted))
            .await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.change, ChangeKind::RequestSubmitted);
    }

    #[tokio::test]
    async fn broadcast_reaches_only_the_target_room() {
        let hub = SessionChangeHub::with_default_capacity();
        let watched = SessionId::new();
        let other = SessionId::new();

        let mut watched_rx = hub.join(&watched, ObserverId::new()).await;
        let mut other_rx = hub.join(&other, ObserverId::new()).await;

        hub.broadcast(&watched, change(ChangeKind::SessionCancelled))
            .await;

        assert_eq!(
            watched_rx.recv().await.unwrap().change,
            ChangeKind::SessionCancelled
        );
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_to_empty_room_is_noop() {
        let hub = SessionChangeHub::with_default_capacity();
        hub.broadcast(&SessionId::new(), change(ChangeKind::SessionCompleted))
            .await;
    }

    #[tokio::test]
    async fn all_observers_in_room_receive_broadcast() {
        let hub = SessionChangeHub::with_default_capacity();
        let session_id = SessionId::new();

        let mut rx_a = hub.join(&session_id, ObserverId::new()).await;
        let mut rx_b = hub.join(&session_id, ObserverId::new()).await;

        hub.broadcast(&session_id, change(ChangeKind::RequestAccepted))
            .await;

        assert_eq!(rx_a.recv().await.unwrap().change, ChangeKind::RequestAccepted);
        assert_eq!(rx_b.recv().await.unwrap().change, ChangeKind::RequestAccepted);
    }

    #[tokio::test]
    async fn leave_drops_empty_room() {
        let hub = SessionChangeHub::with_default_capacity();
        let session_id = SessionId::new();
        let observer = ObserverId::new();

        let rx = hub.join(&session_id, observer.clone()).await;
        assert_eq!(hub.observer_count(&session_id).await, 1);
        assert_eq!(hub.active_rooms().await.len(), 1);

        drop(rx);
        hub.leave(&observer).await;

        assert_eq!(hub.observer_count(&session_id).await, 0);
        assert!(hub.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn room_survives_while_other_observers_remain() {
        let hub = SessionChangeHub::with_default_capacity();
        let session_id = SessionId::new();
        let leaver = ObserverId::new();

        let rx_leaver = hub.join(&session_id, leaver.clone()).await;
        let _rx_stayer = hub.join(&session_id, ObserverId::new()).await;

        drop(rx_leaver);
        hub.leave(&leaver).await;

        assert_eq!(hub.observer_count(&session_id).await, 1);
        assert_eq!(hub.active_rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn total_observer_count_spans_rooms() {
        let hub = SessionChangeHub::with_default_capacity();
        let _rx_a = hub.join(&SessionId::new(), ObserverId::new()).await;
        let _rx_b = hub.join(&SessionId::new(), ObserverId::new()).await;
        let _rx_c = hub.join(&SessionId::new(), ObserverId::new()).await;

        assert_eq!(hub.total_observer_count().await, 3);
    }
}
