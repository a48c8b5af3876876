//! SubmitRequestHandler - Command handler for asking to join a session.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, ErrorCode, EventId, RequestId, SerializableDomainEvent, SessionId,
    SessionStatus, Timestamp,
};
use crate::domain::match_request::{MatchRequest, MatchRequestError, RequestSubmitted};
use crate::ports::{EventPublisher, MatchRequestRepository, SessionRepository};

/// Command to submit a match request.
#[derive(Debug, Clone)]
pub struct SubmitRequestCommand {
    pub session_id: SessionId,
    /// Optional note to the session creator.
    pub message: Option<String>,
}

/// Handler for submitting match requests.
///
/// A request is accepted only while the session is effectively open:
/// not full, not cancelled, and not past its scheduled end. The
/// requester must not be the creator and must not already hold an
/// active request for the session.
pub struct SubmitRequestHandler {
    sessions: Arc<dyn SessionRepository>,
    requests: Arc<dyn MatchRequestRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitRequestHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        requests: Arc<dyn MatchRequestRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            sessions,
            requests,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<MatchRequest, MatchRequestError> {
        let session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| MatchRequestError::session_not_found(cmd.session_id))?;

        if session.is_creator(&metadata.user_id) {
            return Err(MatchRequestError::SelfJoin);
        }

        let now = Timestamp::now();
        match session.effective_status(&now) {
            SessionStatus::Open => {}
            status => {
                return Err(MatchRequestError::session_closed(format!(
                    "Session is {}",
                    status
                )))
            }
        }

        if self
            .requests
            .has_active(&cmd.session_id, &metadata.user_id)
            .await?
        {
            return Err(MatchRequestError::Duplicate);
        }

        let request = MatchRequest::new(
            RequestId::new(),
            cmd.session_id,
            metadata.user_id.clone(),
            cmd.message,
        )?;

        // The store enforces the one-active-request rule again; a racing
        // duplicate loses here
        self.requests.save(&request).await.map_err(|e| {
            if e.code == ErrorCode::DuplicateRequest {
                MatchRequestError::Duplicate
            } else {
                MatchRequestError::from(e)
            }
        })?;

        let event = RequestSubmitted {
            event_id: EventId::new(),
            request_id: *request.id(),
            session_id: cmd.session_id,
            requester_id: metadata.user_id.clone(),
            occurred_at: *request.created_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(request)
    }
}
