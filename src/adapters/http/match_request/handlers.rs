//! HTTP handlers for match request endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{request_error_response, ErrorResponse};
use crate::adapters::http::identity::Identity;
use crate::adapters::http::session::RequestResponse;
use crate::application::handlers::match_request::{
    DecideRequestCommand, DecideRequestHandler, Decision, SubmitRequestCommand,
    SubmitRequestHandler, WithdrawRequestCommand, WithdrawRequestHandler,
};
use crate::domain::foundation::{CommandMetadata, RequestId};

use super::dto::{DecisionResponse, SubmitRequestBody, WithdrawResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RequestApi {
    submit_handler: Arc<SubmitRequestHandler>,
    decide_handler: Arc<DecideRequestHandler>,
    withdraw_handler: Arc<WithdrawRequestHandler>,
}

impl RequestApi {
    pub fn new(
        submit_handler: Arc<SubmitRequestHandler>,
        decide_handler: Arc<DecideRequestHandler>,
        withdraw_handler: Arc<WithdrawRequestHandler>,
    ) -> Self {
        Self {
            submit_handler,
            decide_handler,
            withdraw_handler,
        }
    }
}

fn parse_request_id(raw: &str) -> Result<RequestId, Response> {
    raw.parse::<RequestId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid request ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/requests - Ask to join a session
pub async fn submit_request(
    State(api): State<RequestApi>,
    Identity(user): Identity,
    Json(body): Json<SubmitRequestBody>,
) -> Response {
    let cmd = SubmitRequestCommand {
        session_id: body.session_id,
        message: body.message,
    };
    let metadata = CommandMetadata::new(user).with_source("http");

    match api.submit_handler.handle(cmd, metadata).await {
        Ok(request) => {
            (StatusCode::CREATED, Json(RequestResponse::from(&request))).into_response()
        }
        Err(e) => request_error_response(e),
    }
}

/// POST /api/requests/:id/accept - Accept a pending request
pub async fn accept_request(
    State(api): State<RequestApi>,
    Identity(user): Identity,
    Path(request_id): Path<String>,
) -> Response {
    decide(api, user, &request_id, Decision::Accept).await
}

/// POST /api/requests/:id/decline - Decline a pending request
pub async fn decline_request(
    State(api): State<RequestApi>,
    Identity(user): Identity,
    Path(request_id): Path<String>,
) -> Response {
    decide(api, user, &request_id, Decision::Decline).await
}

async fn decide(
    api: RequestApi,
    user: crate::domain::foundation::UserId,
    raw_request_id: &str,
    decision: Decision,
) -> Response {
    let request_id = match parse_request_id(raw_request_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DecideRequestCommand {
        request_id,
        decision,
    };
    let metadata = CommandMetadata::new(user).with_source("http");

    match api.decide_handler.handle(cmd, metadata).await {
        Ok(outcome) => (StatusCode::OK, Json(DecisionResponse::from(&outcome))).into_response(),
        Err(e) => request_error_response(e),
    }
}

/// POST /api/requests/:id/withdraw - Withdraw an own request
pub async fn withdraw_request(
    State(api): State<RequestApi>,
    Identity(user): Identity,
    Path(request_id): Path<String>,
) -> Response {
    let request_id = match parse_request_id(&request_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = WithdrawRequestCommand { request_id };
    let metadata = CommandMetadata::new(user).with_source("http");

    match api.withdraw_handler.handle(cmd, metadata).await {
        Ok(outcome) => (StatusCode::OK, Json(WithdrawResponse::from(&outcome))).into_response(),
        Err(e) => request_error_response(e),
    }
}
