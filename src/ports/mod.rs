//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionRepository` - Session aggregate persistence (write side)
//! - `MatchRequestRepository` - Match request persistence, including the
//!   atomic accept/withdraw operations that move slot counts
//! - `SessionBrowser` - Read-side browse/filter queries
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod event_publisher;
mod event_subscriber;
mod match_request_repository;
mod session_browser;
mod session_repository;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use match_request_repository::MatchRequestRepository;
pub use session_browser::{SessionBrowser, SessionFilter};
pub use session_repository::SessionRepository;
