//! DecideRequestHandler - Command handler for the creator's decision.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, RequestId, RequestStatus, SerializableDomainEvent, SessionStatus,
    Timestamp,
};
use crate::domain::match_request::{
    MatchRequest, MatchRequestError, RequestAccepted, RequestDeclined,
};
use crate::ports::{EventPublisher, MatchRequestRepository, SessionRepository};

/// The creator's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

/// Command carrying a decision on a request.
#[derive(Debug, Clone)]
pub struct DecideRequestCommand {
    pub request_id: RequestId,
    pub decision: Decision,
}

/// Outcome of a decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub request: MatchRequest,
    /// True when an acceptance claimed the last slot.
    pub session_became_full: bool,
}

/// Handler for accepting or declining match requests.
///
/// Acceptance claims a player slot, so it goes through the repository's
/// atomic accept operation; under concurrent accepts for the last slot
/// exactly one wins and the rest see `CapacityExceeded` with their
/// requests left pending.
pub struct DecideRequestHandler {
    sessions: Arc<dyn SessionRepository>,
    requests: Arc<dyn MatchRequestRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DecideRequestHandler {
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
        cmd: DecideRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<DecisionOutcome, MatchRequestError> {
        let request = self
            .requests
            .find_by_id(&cmd.request_id)
            .await?
            .ok_or_else(|| MatchRequestError::not_found(cmd.request_id))?;

        if request.status() != RequestStatus::Pending {
            return Err(MatchRequestError::invalid_state(format!(
                "Request is already {}",
                request.status()
            )));
        }

        let session = self
            .sessions
            .find_by_id(request.session_id())
            .await?
            .ok_or_else(|| MatchRequestError::session_not_found(*request.session_id()))?;

        session.authorize_creator(&metadata.user_id)?;

        let now = Timestamp::now();
        if session.effective_status(&now).is_terminal() {
            return Err(MatchRequestError::session_closed(format!(
                "Session is {}",
                session.effective_status(&now)
            )));
        }

        match cmd.decision {
            Decision::Accept => self.accept(request, metadata).await,
            Decision::Decline => self.decline(request, metadata).await,
        }
    }

    async fn accept(
        &self,
        request: MatchRequest,
        metadata: CommandMetadata,
    ) -> Result<DecisionOutcome, MatchRequestError> {
        let became_full = self
            .requests
            .accept_claiming_slot(request.id(), request.session_id())
            .await?;

        let request = self
            .requests
            .find_by_id(request.id())
            .await?
            .ok_or_else(|| MatchRequestError::not_found(*request.id()))?;

        let event = RequestAccepted {
            event_id: EventId::new(),
            request_id: *request.id(),
            session_id: *request.session_id(),
            requester_id: request.requester_id().clone(),
            session_became_full: became_full,
            occurred_at: *request.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(DecisionOutcome {
            request,
            session_became_full: became_full,
        })
    }

    async fn decline(
        &self,
        mut request: MatchRequest,
        metadata: CommandMetadata,
    ) -> Result<DecisionOutcome, MatchRequestError> {
        request.decline()?;
        self.requests.update(&request).await?;

        let event = RequestDeclined {
            event_id: EventId::new(),
            request_id: *request.id(),
            session_id: *request.session_id(),
            requester_id: request.requester_id().clone(),
            occurred_at: *request.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(DecisionOutcome {
            request,
            session_became_full: false,
        })
    }
}
