//! Integration tests for the session booking workflow.
//!
//! These tests drive the command handlers end to end over the in-memory
//! store and event bus, with the realtime bridge subscribed the way the
//! server wires it:
//! 1. Creator opens a session
//! 2. Players submit join requests
//! 3. Creator accepts/declines; acceptance claims slots atomically
//! 4. Withdrawal of an accepted request reopens a full session
//! 5. Observers see every committed change in their session room

use std::sync::Arc;

use rallypoint::adapters::realtime::{ChangeKind, ObserverId, SessionChangeBridge, SessionChangeHub};
use rallypoint::adapters::{InMemoryEventBus, InMemoryStore};
use rallypoint::application::handlers::match_request::{
    DecideRequestCommand, DecideRequestHandler, Decision, SubmitRequestCommand,
    SubmitRequestHandler, WithdrawRequestCommand, WithdrawRequestHandler,
};
use rallypoint::application::handlers::session::{
    BrowseSessionsHandler, BrowseSessionsQuery, CancelSessionCommand, CancelSessionHandler,
    CompleteElapsedHandler, CreateSessionCommand, CreateSessionHandler,
};
use rallypoint::domain::foundation::{
    CommandMetadata, Intent, RequestStatus, SessionId, SessionStatus, SkillLevel, SkillRange,
    Timestamp, UserId,
};
use rallypoint::domain::match_request::MatchRequestError;
use rallypoint::domain::session::Session;
use rallypoint::ports::{EventPublisher, SessionFilter, SessionRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    store: Arc<InMemoryStore>,
    bus: Arc<InMemoryEventBus>,
    hub: Arc<SessionChangeHub>,
    create: CreateSessionHandler,
    browse: BrowseSessionsHandler,
    cancel: CancelSessionHandler,
    sweep: CompleteElapsedHandler,
    submit: SubmitRequestHandler,
    decide: DecideRequestHandler,
    withdraw: WithdrawRequestHandler,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let hub = Arc::new(SessionChangeHub::with_default_capacity());

        let bridge = SessionChangeBridge::new_shared(hub.clone());
        bridge.register(bus.as_ref());

        let publisher: Arc<dyn EventPublisher> = bus.clone();

        Self {
            create: CreateSessionHandler::new(store.clone(), publisher.clone()),
            browse: BrowseSessionsHandler::new(store.clone()),
            cancel: CancelSessionHandler::new(store.clone(), publisher.clone()),
            sweep: CompleteElapsedHandler::new(store.clone(), publisher.clone()),
            submit: SubmitRequestHandler::new(store.clone(), store.clone(), publisher.clone()),
            decide: DecideRequestHandler::new(store.clone(), store.clone(), publisher.clone()),
            withdraw: WithdrawRequestHandler::new(store.clone(), publisher),
            store,
            bus,
            hub,
        }
    }

    async fn create_session(&self, creator: &str, max_players: u32) -> Session {
        let cmd = CreateSessionCommand {
            creator_id: UserId::new(creator).unwrap(),
            title: "Saturday doubles".to_string(),
            location: "Riverside Park Court 2".to_string(),
            date_time: Timestamp::now().plus_days(2),
            duration_minutes: 90,
            intent: Intent::Match,
            skill_min: SkillLevel::Ntrp30,
            skill_max: SkillLevel::Ntrp40,
            max_players,
        };

        self.create
            .handle(cmd, metadata(creator))
            .await
            .unwrap()
            .session
    }

    async fn stored_session(&self, id: &SessionId) -> Session {
        SessionRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap()
    }
}

fn metadata(user: &str) -> CommandMetadata {
    CommandMetadata::new(UserId::new(user).unwrap()).with_source("test")
}

// =============================================================================
// Workflow
// =============================================================================

#[tokio::test]
async fn full_lifecycle_from_open_to_cancelled() {
    let app = TestApp::new();

    // Creator opens a session with two joinable slots
    let session = app.create_session("creator-1", 2).await;
    assert_eq!(session.status(), SessionStatus::Open);
    assert_eq!(session.current_players(), 0);

    // Two players ask to join
    let first = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: Some("Looking for a steady rally partner".to_string()),
            },
            metadata("player-2"),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), RequestStatus::Pending);
    assert_eq!(first.message(), Some("Looking for a steady rally partner"));

    let last = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-3"),
        )
        .await
        .unwrap();

    // Creator accepts both; the second acceptance fills the session
    let outcome = app
        .decide
        .handle(
            DecideRequestCommand {
                request_id: *first.id(),
                decision: Decision::Accept,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();
    assert!(!outcome.session_became_full);

    let outcome = app
        .decide
        .handle(
            DecideRequestCommand {
                request_id: *last.id(),
                decision: Decision::Accept,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();
    assert!(outcome.session_became_full);
    assert_eq!(
        app.stored_session(session.id()).await.status(),
        SessionStatus::Full
    );

    // Full sessions take no further requests
    let rejected = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-4"),
        )
        .await;
    assert!(matches!(rejected, Err(MatchRequestError::SessionClosed(_))));

    // An accepted player backs out; the session reopens
    let withdrawal = app
        .withdraw
        .handle(
            WithdrawRequestCommand {
                request_id: *last.id(),
            },
            metadata("player-3"),
        )
        .await
        .unwrap();
    assert!(withdrawal.session_reopened);
    let reopened = app.stored_session(session.id()).await;
    assert_eq!(reopened.status(), SessionStatus::Open);
    assert_eq!(reopened.current_players(), 1);

    // Creator calls it off
    let cancelled = app
        .cancel
        .handle(
            CancelSessionCommand {
                session_id: *session.id(),
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status(), SessionStatus::Cancelled);

    // Every step produced its event
    for event_type in [
        "session.created.v1",
        "request.submitted.v1",
        "request.accepted.v1",
        "request.withdrawn.v1",
        "session.cancelled.v1",
    ] {
        assert!(app.bus.has_event(event_type), "missing {}", event_type);
    }
}

#[tokio::test]
async fn concurrent_accepts_admit_exactly_one_for_the_last_slot() {
    let app = TestApp::new();
    let session = app.create_session("creator-1", 2).await;

    // The first slot goes quietly; the race is for the last one
    let first = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-1"),
        )
        .await
        .unwrap();
    app.decide
        .handle(
            DecideRequestCommand {
                request_id: *first.id(),
                decision: Decision::Accept,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();

    // Five more players queue up
    let mut request_ids = Vec::new();
    for i in 0..5 {
        let request = app
            .submit
            .handle(
                SubmitRequestCommand {
                    session_id: *session.id(),
                    message: None,
                },
                metadata(&format!("player-{}", i + 2)),
            )
            .await
            .unwrap();
        request_ids.push(*request.id());
    }

    // Creator fires accepts for all of them at once
    let publisher: Arc<dyn EventPublisher> = app.bus.clone();
    let decide = Arc::new(DecideRequestHandler::new(
        app.store.clone(),
        app.store.clone(),
        publisher,
    ));
    let mut tasks = Vec::new();
    for request_id in request_ids {
        let decide = decide.clone();
        tasks.push(tokio::spawn(async move {
            decide
                .handle(
                    DecideRequestCommand {
                        request_id,
                        decision: Decision::Accept,
                    },
                    metadata("creator-1"),
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut capacity_rejections = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.session_became_full);
                successes += 1;
            }
            Err(MatchRequestError::CapacityExceeded) => capacity_rejections += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(capacity_rejections, 4);

    let stored = app.stored_session(session.id()).await;
    assert_eq!(stored.current_players(), 2);
    assert_eq!(stored.status(), SessionStatus::Full);
}

#[tokio::test]
async fn declined_player_can_try_again() {
    let app = TestApp::new();
    let session = app.create_session("creator-1", 4).await;

    let first = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-2"),
        )
        .await
        .unwrap();

    app.decide
        .handle(
            DecideRequestCommand {
                request_id: *first.id(),
                decision: Decision::Decline,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();

    // The slot count never moved
    assert_eq!(app.stored_session(session.id()).await.current_players(), 0);

    // A declined request no longer blocks resubmission
    let second = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-2"),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), RequestStatus::Pending);
}

// =============================================================================
// Browse
// =============================================================================

#[tokio::test]
async fn browse_excludes_full_and_cancelled_sessions() {
    let app = TestApp::new();

    let open = app.create_session("creator-1", 4).await;
    let filling = app.create_session("creator-2", 2).await;
    let doomed = app.create_session("creator-3", 4).await;

    // Fill one session
    for player in ["player-8", "player-9"] {
        let request = app
            .submit
            .handle(
                SubmitRequestCommand {
                    session_id: *filling.id(),
                    message: None,
                },
                metadata(player),
            )
            .await
            .unwrap();
        app.decide
            .handle(
                DecideRequestCommand {
                    request_id: *request.id(),
                    decision: Decision::Accept,
                },
                metadata("creator-2"),
            )
            .await
            .unwrap();
    }

    // Cancel another
    app.cancel
        .handle(
            CancelSessionCommand {
                session_id: *doomed.id(),
            },
            metadata("creator-3"),
        )
        .await
        .unwrap();

    let visible = app
        .browse
        .handle(BrowseSessionsQuery::default())
        .await
        .unwrap();

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), open.id());
}

#[tokio::test]
async fn browse_matches_skill_bands_by_overlap() {
    let app = TestApp::new();
    let session = app.create_session("creator-1", 4).await; // band 3.0-4.0

    // 4.0-4.5 shares the 4.0 level with the session's band
    let overlapping = SessionFilter {
        skill: Some(SkillRange::new(SkillLevel::Ntrp40, SkillLevel::Ntrp45).unwrap()),
        ..Default::default()
    };
    let visible = app
        .browse
        .handle(BrowseSessionsQuery {
            filter: overlapping,
        })
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), session.id());

    // 4.5-4.5 shares nothing
    let disjoint = SessionFilter {
        skill: Some(SkillRange::new(SkillLevel::Ntrp45, SkillLevel::Ntrp45).unwrap()),
        ..Default::default()
    };
    let visible = app
        .browse
        .handle(BrowseSessionsQuery { filter: disjoint })
        .await
        .unwrap();
    assert!(visible.is_empty());
}

// =============================================================================
// Completion sweep
// =============================================================================

#[tokio::test]
async fn sweep_completes_elapsed_sessions_and_publishes() {
    let app = TestApp::new();
    let session = app.create_session("creator-1", 4).await;

    // Too early: nothing to do
    let completed = app.sweep.handle(Timestamp::now()).await.unwrap();
    assert!(completed.is_empty());

    // Past the scheduled end the sweep persists completion
    let after_end = session.scheduled_end().plus_minutes(1);
    let completed = app.sweep.handle(after_end).await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(
        app.stored_session(session.id()).await.status(),
        SessionStatus::Completed
    );
    assert!(app.bus.has_event("session.completed.v1"));

    // Running again is a no-op
    let completed = app.sweep.handle(after_end).await.unwrap();
    assert!(completed.is_empty());
}

// =============================================================================
// Realtime
// =============================================================================

#[tokio::test]
async fn observers_see_request_workflow_in_their_room() {
    let app = TestApp::new();
    let session = app.create_session("creator-1", 2).await;
    let other = app.create_session("creator-2", 2).await;

    // One slot is already taken before anyone is watching
    let prior = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-9"),
        )
        .await
        .unwrap();
    app.decide
        .handle(
            DecideRequestCommand {
                request_id: *prior.id(),
                decision: Decision::Accept,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();

    let mut room = app.hub.join(session.id(), ObserverId::new()).await;
    let mut other_room = app.hub.join(other.id(), ObserverId::new()).await;

    let request = app
        .submit
        .handle(
            SubmitRequestCommand {
                session_id: *session.id(),
                message: None,
            },
            metadata("player-2"),
        )
        .await
        .unwrap();

    app.decide
        .handle(
            DecideRequestCommand {
                request_id: *request.id(),
                decision: Decision::Accept,
            },
            metadata("creator-1"),
        )
        .await
        .unwrap();

    let submitted = room.recv().await.unwrap();
    assert_eq!(submitted.change, ChangeKind::RequestSubmitted);
    assert_eq!(submitted.data["session_id"], session.id().to_string());

    let accepted = room.recv().await.unwrap();
    assert_eq!(accepted.change, ChangeKind::RequestAccepted);
    assert_eq!(accepted.data["session_became_full"], true);

    // The other session's room saw nothing
    assert!(other_room.try_recv().is_err());
}
