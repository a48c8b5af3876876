//! HTTP adapters - REST and WebSocket surface.
//!
//! Each domain module has its own HTTP adapter; `api_router` assembles
//! them under `/api`.

pub mod error;
pub mod identity;
pub mod match_request;
pub mod session;
pub mod ws;

use axum::Router;

pub use error::ErrorResponse;
pub use identity::Identity;
pub use match_request::{request_routes, RequestApi};
pub use session::{session_routes, SessionApi};
pub use ws::{subscribe_routes, SubscribeState};

/// Assemble the full API router.
pub fn api_router(
    session_api: SessionApi,
    request_api: RequestApi,
    subscribe_state: SubscribeState,
) -> Router {
    Router::new().nest(
        "/api",
        session_routes(session_api)
            .merge(request_routes(request_api))
            .merge(subscribe_routes(subscribe_state)),
    )
}
