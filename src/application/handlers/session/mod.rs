//! Session command and query handlers.

mod browse_sessions;
mod cancel_session;
mod complete_elapsed;
mod complete_session;
mod create_session;

pub use browse_sessions::{BrowseSessionsHandler, BrowseSessionsQuery};
pub use cancel_session::{CancelSessionCommand, CancelSessionHandler};
pub use complete_elapsed::CompleteElapsedHandler;
pub use complete_session::{CompleteSessionCommand, CompleteSessionHandler};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
