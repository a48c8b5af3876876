//! HTTP routes for match request endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    accept_request, decline_request, submit_request, withdraw_request, RequestApi,
};

/// Creates the match request router with all endpoints.
pub fn request_routes(api: RequestApi) -> Router {
    Router::new()
        .route("/requests", post(submit_request))
        .route("/requests/:id/accept", post(accept_request))
        .route("/requests/:id/decline", post(decline_request))
        .route("/requests/:id/withdraw", post(withdraw_request))
        .with_state(api)
}
