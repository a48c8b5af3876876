//! Domain events emitted by the match-request workflow.
//!
//! Every event carries the `session_id` so the realtime layer can route
//! it to the session's observers without a lookup.

use crate::domain::foundation::{domain_event, EventId, RequestId, SessionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A player asked to join a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSubmitted {
    pub event_id: EventId,
    pub request_id: RequestId,
    pub session_id: SessionId,
    pub requester_id: UserId,
    pub occurred_at: Timestamp,
}

domain_event!(
    RequestSubmitted,
    event_type = "request.submitted.v1",
    schema_version = 1,
    aggregate_id = request_id,
    aggregate_type = "MatchRequest",
    occurred_at = occurred_at,
    event_id = event_id
);

/// The creator accepted a request and the slot was claimed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestAccepted {
    pub event_id: EventId,
    pub request_id: RequestId,
    pub session_id: SessionId,
    pub requester_id: UserId,
    /// True when this acceptance claimed the last slot.
    pub session_became_full: bool,
    pub occurred_at: Timestamp,
}

domain_event!(
    RequestAccepted,
    event_type = "request.accepted.v1",
    schema_version = 1,
    aggregate_id = request_id,
    aggregate_type = "MatchRequest",
    occurred_at = occurred_at,
    event_id = event_id
);

/// The creator declined a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDeclined {
    pub event_id: EventId,
    pub request_id: RequestId,
    pub session_id: SessionId,
    pub requester_id: UserId,
    pub occurred_at: Timestamp,
}

domain_event!(
    RequestDeclined,
    event_type = "request.declined.v1",
    schema_version = 1,
    aggregate_id = request_id,
    aggregate_type = "MatchRequest",
    occurred_at = occurred_at,
    event_id = event_id
);

/// The requester withdrew; an accepted request releases its slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithdrawn {
    pub event_id: EventId,
    pub request_id: RequestId,
    pub session_id: SessionId,
    pub requester_id: UserId,
    /// True when withdrawing released the last claimed slot of a full
    /// session, reopening it.
    pub session_reopened: bool,
    pub occurred_at: Timestamp,
}

domain_event!(
    RequestWithdrawn,
    event_type = "request.withdrawn.v1",
    schema_version = 1,
    aggregate_id = request_id,
    aggregate_type = "MatchRequest",
    occurred_at = occurred_at,
    event_id = event_id
);
