//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{session_error_response, ErrorResponse};
use crate::adapters::http::identity::Identity;
use crate::application::handlers::session::{
    BrowseSessionsHandler, BrowseSessionsQuery, CancelSessionCommand, CancelSessionHandler,
    CompleteSessionCommand, CompleteSessionHandler, CreateSessionCommand, CreateSessionHandler,
};
use crate::domain::foundation::{CommandMetadata, SessionId, Timestamp};
use crate::ports::{MatchRequestRepository, SessionRepository};

use super::dto::{
    BrowseSessionsParams, CreateSessionRequest, RequestResponse, SessionDetailResponse,
    SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionApi {
    create_handler: Arc<CreateSessionHandler>,
    browse_handler: Arc<BrowseSessionsHandler>,
    cancel_handler: Arc<CancelSessionHandler>,
    complete_handler: Arc<CompleteSessionHandler>,
    sessions: Arc<dyn SessionRepository>,
    requests: Arc<dyn MatchRequestRepository>,
}

impl SessionApi {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        browse_handler: Arc<BrowseSessionsHandler>,
        cancel_handler: Arc<CancelSessionHandler>,
        complete_handler: Arc<CompleteSessionHandler>,
        sessions: Arc<dyn SessionRepository>,
        requests: Arc<dyn MatchRequestRepository>,
    ) -> Self {
        Self {
            create_handler,
            browse_handler,
            cancel_handler,
            complete_handler,
            sessions,
            requests,
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Open a new session
pub async fn create_session(
    State(api): State<SessionApi>,
    Identity(user): Identity,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let cmd = CreateSessionCommand {
        creator_id: user.clone(),
        title: req.title,
        location: req.location,
        date_time: req.date_time,
        duration_minutes: req.duration_minutes,
        intent: req.intent,
        skill_min: req.skill_min,
        skill_max: req.skill_max,
        max_players: req.max_players,
    };

    let metadata = CommandMetadata::new(user).with_source("http");

    match api.create_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = SessionResponse::from(&result.session);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => session_error_response(e),
    }
}

/// GET /api/sessions - Browse joinable sessions
pub async fn browse_sessions(
    State(api): State<SessionApi>,
    Identity(_user): Identity,
    Query(params): Query<BrowseSessionsParams>,
) -> Response {
    let filter = match params.into_filter() {
        Ok(filter) => filter,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(message)),
            )
                .into_response()
        }
    };

    match api
        .browse_handler
        .handle(BrowseSessionsQuery { filter })
        .await
    {
        Ok(sessions) => {
            let response: Vec<SessionResponse> =
                sessions.iter().map(SessionResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => session_error_response(e),
    }
}

/// GET /api/sessions/mine - List sessions created by the caller
pub async fn my_sessions(State(api): State<SessionApi>, Identity(user): Identity) -> Response {
    match api.sessions.find_by_creator(&user).await {
        Ok(sessions) => {
            let response: Vec<SessionResponse> =
                sessions.iter().map(SessionResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => session_error_response(e.into()),
    }
}

/// GET /api/sessions/:id - Session detail with its request list
pub async fn get_session(
    State(api): State<SessionApi>,
    Identity(_user): Identity,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let session = match api.sessions.find_by_id(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return session_error_response(crate::domain::session::SessionError::not_found(
                session_id,
            ))
        }
        Err(e) => return session_error_response(e.into()),
    };

    let requests = match api.requests.find_by_session(&session_id).await {
        Ok(requests) => requests,
        Err(e) => return session_error_response(e.into()),
    };

    let response = SessionDetailResponse {
        session: SessionResponse::as_of(&session, &Timestamp::now()),
        requests: requests.iter().map(RequestResponse::from).collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/sessions/:id/cancel - Cancel a session
pub async fn cancel_session(
    State(api): State<SessionApi>,
    Identity(user): Identity,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let metadata = CommandMetadata::new(user).with_source("http");

    match api
        .cancel_handler
        .handle(CancelSessionCommand { session_id }, metadata)
        .await
    {
        Ok(session) => {
            (StatusCode::OK, Json(SessionResponse::from(&session))).into_response()
        }
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/complete - Close out a session early
pub async fn complete_session(
    State(api): State<SessionApi>,
    Identity(user): Identity,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let metadata = CommandMetadata::new(user).with_source("http");

    match api
        .complete_handler
        .handle(CompleteSessionCommand { session_id }, metadata)
        .await
    {
        Ok(session) => {
            (StatusCode::OK, Json(SessionResponse::from(&session))).into_response()
        }
        Err(e) => session_error_response(e),
    }
}
