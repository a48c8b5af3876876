//! Domain events emitted by the session lifecycle.

use crate::domain::foundation::{
    domain_event, EventId, Intent, SessionId, SkillRange, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// A new session was opened for booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub creator_id: UserId,
    pub title: String,
    pub location: String,
    pub date_time: Timestamp,
    pub duration_minutes: u32,
    pub intent: Intent,
    pub skill_range: SkillRange,
    pub max_players: u32,
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionCreated,
    event_type = "session.created.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = occurred_at,
    event_id = event_id
);

/// The creator cancelled the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelled {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub cancelled_by: UserId,
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionCancelled,
    event_type = "session.cancelled.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = occurred_at,
    event_id = event_id
);

/// The session's scheduled end passed, or the creator closed it out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionCompleted,
    event_type = "session.completed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = occurred_at,
    event_id = event_id
);
