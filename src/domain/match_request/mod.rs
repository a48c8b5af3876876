//! Match request module: the join-request workflow.
//!
//! A player asks to join a session; the session creator accepts or
//! declines. Accepting claims a player slot, so acceptance and the slot
//! claim commit together.

mod aggregate;
mod errors;
mod events;

pub use aggregate::MatchRequest;
pub use errors::MatchRequestError;
pub use events::{RequestAccepted, RequestDeclined, RequestSubmitted, RequestWithdrawn};
