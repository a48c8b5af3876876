//! Session module: the bookable tennis session aggregate.
//!
//! A session is created by one player, advertises a time slot, skill band,
//! and intent, and fills up as the creator accepts match requests.

mod aggregate;
mod errors;
mod events;

pub use aggregate::{
    Session, ALLOWED_DURATIONS_MINUTES, MAX_LOCATION_LENGTH, MAX_TITLE_LENGTH, MIN_PLAYERS,
};
pub use errors::SessionError;
pub use events::{SessionCancelled, SessionCompleted, SessionCreated};
