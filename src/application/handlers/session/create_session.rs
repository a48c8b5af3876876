//! CreateSessionHandler - Command handler for opening new sessions.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, Intent, SerializableDomainEvent, SessionId, SkillLevel, SkillRange,
    Timestamp, UserId,
};
use crate::domain::session::{Session, SessionCreated, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to open a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub creator_id: UserId,
    pub title: String,
    pub location: String,
    pub date_time: Timestamp,
    pub duration_minutes: u32,
    pub intent: Intent,
    pub skill_min: SkillLevel,
    pub skill_max: SkillLevel,
    pub max_players: u32,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: Session,
    pub event: SessionCreated,
}

/// Handler for opening sessions.
pub struct CreateSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateSessionHandler {
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
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, SessionError> {
        let skill_range = SkillRange::new(cmd.skill_min, cmd.skill_max)
            .map_err(|e| SessionError::validation("skill_range", e.to_string()))?;

        let session = Session::new(
            SessionId::new(),
            cmd.creator_id.clone(),
            cmd.title,
            cmd.location,
            cmd.date_time,
            cmd.duration_minutes,
            cmd.intent,
            skill_range,
            cmd.max_players,
        )?;

        self.repository.save(&session).await?;

        let event = SessionCreated {
            event_id: EventId::new(),
            session_id: *session.id(),
            creator_id: cmd.creator_id,
            title: session.title().to_string(),
            location: session.location().to_string(),
            date_time: *session.date_time(),
            duration_minutes: session.duration_minutes(),
            intent: session.intent(),
            skill_range: *session.skill_range(),
            max_players: session.max_players(),
            occurred_at: *session.created_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(CreateSessionResult { session, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::SessionStatus;

    fn test_command() -> CreateSessionCommand {
        CreateSessionCommand {
            creator_id: UserId::new("creator-1").unwrap(),
            title: "Evening doubles".to_string(),
            location: "Riverside Park, Court 3".to_string(),
            date_time: Timestamp::now().plus_days(1),
            duration_minutes: 90,
            intent: Intent::Match,
            skill_min: SkillLevel::Ntrp30,
            skill_max: SkillLevel::Ntrp40,
            max_players: 4,
        }
    }

    fn test_metadata() -> CommandMetadata {
        CommandMetadata::test_fixture_for("creator-1").with_correlation_id("test-correlation")
    }

    #[tokio::test]
    async fn creates_open_session_with_empty_slots() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateSessionHandler::new(store.clone(), bus);

        let result = handler.handle(test_command(), test_metadata()).await.unwrap();

        assert_eq!(result.session.status(), SessionStatus::Open);
        assert_eq!(result.session.current_players(), 0);

        let stored = SessionRepository::find_by_id(store.as_ref(), result.session.id())
            .await
            .unwrap();
        assert_eq!(stored, Some(result.session));
    }

    #[tokio::test]
    async fn publishes_session_created_event() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateSessionHandler::new(store, bus.clone());

        let result = handler.handle(test_command(), test_metadata()).await.unwrap();

        let events = bus.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "session.created.v1");
        assert_eq!(events[0].aggregate_id, result.session.id().to_string());
        assert_eq!(
            events[0].metadata.correlation_id,
            Some("test-correlation".to_string())
        );
    }

    #[tokio::test]
    async fn rejects_inverted_skill_band() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateSessionHandler::new(store, bus.clone());

        let cmd = CreateSessionCommand {
            skill_min: SkillLevel::Ntrp45,
            skill_max: SkillLevel::Ntrp30,
            ..test_command()
        };

        let result = handler.handle(cmd, test_metadata()).await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn rejects_past_start_without_publishing() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateSessionHandler::new(store, bus.clone());

        let cmd = CreateSessionCommand {
            date_time: Timestamp::now().plus_days(-1),
            ..test_command()
        };

        let result = handler.handle(cmd, test_metadata()).await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
        assert_eq!(bus.event_count(), 0);
    }
}
