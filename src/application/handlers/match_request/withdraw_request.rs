//! WithdrawRequestHandler - Command handler for a requester backing out.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, RequestId, RequestStatus, SerializableDomainEvent,
};
use crate::domain::match_request::{MatchRequest, MatchRequestError, RequestWithdrawn};
use crate::ports::{EventPublisher, MatchRequestRepository};

/// Command to withdraw a match request.
#[derive(Debug, Clone)]
pub struct WithdrawRequestCommand {
    pub request_id: RequestId,
}

/// Outcome of a withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    pub request: MatchRequest,
    /// True when withdrawing an accepted request reopened a full session.
    pub session_reopened: bool,
}

/// Handler for withdrawing match requests.
///
/// Withdrawing a pending request just settles it; withdrawing an
/// accepted request also releases its slot, which may reopen a full
/// session.
pub struct WithdrawRequestHandler {
    requests: Arc<dyn MatchRequestRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl WithdrawRequestHandler {
    pub fn new(
        requests: Arc<dyn MatchRequestRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            requests,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: WithdrawRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<WithdrawOutcome, MatchRequestError> {
        let mut request = self
            .requests
            .find_by_id(&cmd.request_id)
            .await?
            .ok_or_else(|| MatchRequestError::not_found(cmd.request_id))?;

        if !request.is_requester(&metadata.user_id) {
            return Err(MatchRequestError::Forbidden);
        }

        let session_reopened = match request.status() {
            RequestStatus::Pending => {
                request.withdraw()?;
                self.requests.update(&request).await?;
                false
            }
            RequestStatus::Accepted => {
                let reopened = self
                    .requests
                    .withdraw_releasing_slot(request.id(), request.session_id())
                    .await?;
                request = self
                    .requests
                    .find_by_id(request.id())
                    .await?
                    .ok_or_else(|| MatchRequestError::not_found(cmd.request_id))?;
                reopened
            }
            status => {
                return Err(MatchRequestError::invalid_state(format!(
                    "Request is already {}",
                    status
                )))
            }
        };

        let event = RequestWithdrawn {
            event_id: EventId::new(),
            request_id: *request.id(),
            session_id: *request.session_id(),
            requester_id: request.requester_id().clone(),
            session_reopened,
            occurred_at: *request.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(WithdrawOutcome {
            request,
            session_reopened,
        })
    }
}
