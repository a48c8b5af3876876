//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    browse_sessions, cancel_session, complete_session, create_session, get_session, my_sessions,
    SessionApi,
};

/// Creates the session router with all endpoints.
pub fn session_routes(api: SessionApi) -> Router {
    Router::new()
        .route("/sessions", post(create_session).get(browse_sessions))
        .route("/sessions/mine", get(my_sessions))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/cancel", post(cancel_session))
        .route("/sessions/:id/complete", post(complete_session))
        .with_state(api)
}
