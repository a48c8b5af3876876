//! CompleteElapsedHandler - Sweeper for sessions whose time has passed.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{EventId, SerializableDomainEvent, Timestamp};
use crate::domain::session::{Session, SessionCompleted, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Handler run periodically to complete sessions whose scheduled end has
/// passed.
///
/// Readers treat elapsed sessions as completed immediately via
/// `Session::effective_status`; this sweep persists the transition and
/// publishes the completion events.
pub struct CompleteElapsedHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteElapsedHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    /// Completes every elapsed session as of `now`, returning them.
    pub async fn handle(&self, now: Timestamp) -> Result<Vec<Session>, SessionError> {
        let completed = self.repository.complete_elapsed(&now).await?;

        if completed.is_empty() {
            return Ok(completed);
        }

        info!(count = completed.len(), "completed elapsed sessions");

        let envelopes = completed
            .iter()
            .map(|session| {
                SessionCompleted {
                    event_id: EventId::new(),
                    session_id: *session.id(),
                    occurred_at: now,
                }
                .to_envelope()
            })
            .collect();

        self.event_publisher.publish_all(envelopes).await?;

        Ok(completed)
    }
}
