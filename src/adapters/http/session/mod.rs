//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BrowseSessionsParams, CreateSessionRequest, RequestResponse, SessionDetailResponse,
    SessionResponse,
};
pub use handlers::SessionApi;
pub use routes::session_routes;
