//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `session` - Session aggregate, lifecycle state machine, and events
//! - `match_request` - Match request aggregate, decision workflow, and events

pub mod foundation;
pub mod match_request;
pub mod session;
