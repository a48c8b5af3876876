//! Command and query handlers.
//!
//! One handler per operation. Handlers load aggregates through ports,
//! apply domain transitions, persist, and publish the resulting events
//! with the command's correlation context attached.

pub mod match_request;
pub mod session;
