//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event bus implementations (in-memory)
//! - `memory` - In-memory store for tests and single-process deployments
//! - `postgres` - PostgreSQL persistence
//! - `realtime` - Per-session change broadcasting to connected observers
//! - `http` - REST and WebSocket surface (axum)

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod realtime;

pub use events::InMemoryEventBus;
pub use memory::InMemoryStore;
pub use postgres::{PostgresMatchRequestRepository, PostgresSessionBrowser, PostgresSessionRepository};
pub use realtime::{ObserverId, SessionChangeBridge, SessionChangeHub};
