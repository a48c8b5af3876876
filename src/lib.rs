//! Rallypoint - Tennis session booking and match-request coordination.
//!
//! This crate implements the session lifecycle engine: capacity-bounded
//! join-request workflow, status state machine, browse/filter queries,
//! and real-time change propagation to session observers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
