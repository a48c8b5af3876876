//! PostgreSQL adapters.
//!
//! sqlx-based implementations of the storage ports. Row mapping lives in
//! `row_mapping` so the repositories and the browser share one
//! reconstitution path.

mod match_request_repository;
mod row_mapping;
mod session_browser;
mod session_repository;

pub use match_request_repository::PostgresMatchRequestRepository;
pub use session_browser::PostgresSessionBrowser;
pub use session_repository::PostgresSessionRepository;
