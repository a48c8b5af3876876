//! CompleteSessionHandler - Command handler for closing out a session.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, EventId, SerializableDomainEvent, SessionId};
use crate::domain::session::{Session, SessionCompleted, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to mark a session completed.
#[derive(Debug, Clone)]
pub struct CompleteSessionCommand {
    pub session_id: SessionId,
}

/// Handler for the creator explicitly closing out a session.
///
/// The periodic sweeper completes elapsed sessions automatically; this
/// handler lets the creator do it early (play finished ahead of the
/// scheduled end).
pub struct CompleteSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, SessionError> {
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(cmd.session_id))?;

        session.authorize_creator(&metadata.user_id)?;
        session.complete()?;
        self.repository.update(&session).await?;

        let event = SessionCompleted {
            event_id: EventId::new(),
            session_id: *session.id(),
            occurred_at: *session.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(session)
    }
}
