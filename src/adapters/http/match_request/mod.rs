//! HTTP adapter for match request endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{DecisionResponse, SubmitRequestBody, WithdrawResponse};
pub use handlers::RequestApi;
pub use routes::request_routes;
