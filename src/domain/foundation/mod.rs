//! Shared domain primitives.
//!
//! Value objects, identifiers, status enums, and error types used across
//! the session and match-request modules.

mod command;
mod errors;
mod events;
mod ids;
mod intent;
mod request_status;
mod session_status;
mod skill;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{RequestId, SessionId, UserId};
pub use intent::Intent;
pub use request_status::RequestStatus;
pub use session_status::SessionStatus;
pub use skill::{SkillLevel, SkillRange};
pub use timestamp::Timestamp;
