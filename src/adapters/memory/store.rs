//! In-memory implementation of the storage ports.
//!
//! Backs tests and local development. All three storage ports share one
//! mutex-guarded map pair, so the combined accept/withdraw operations get
//! the same atomicity the Postgres adapter gets from transactions: while
//! the lock is held, nothing else can observe or move the slot count.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{
    DomainError, ErrorCode, RequestId, RequestStatus, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::match_request::MatchRequest;
use crate::domain::session::Session;
use crate::ports::{MatchRequestRepository, SessionBrowser, SessionFilter, SessionRepository};

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<SessionId, Session>,
    requests: HashMap<RequestId, MatchRequest>,
}

/// In-memory store implementing all storage ports.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("InMemoryStore: lock poisoned")
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.lock().sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
            .with_detail("session_id", session.id().to_string()));
        }
        inner.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.lock().sessions.get(id).cloned())
    }

    async fn find_by_creator(&self, creator_id: &UserId) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self
            .lock()
            .sessions
            .values()
            .filter(|s| s.creator_id() == creator_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.date_time().cmp(a.date_time()).then(a.id().cmp(b.id())));
        Ok(sessions)
    }

    async fn complete_elapsed(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError> {
        let mut inner = self.lock();
        let mut completed = Vec::new();
        for session in inner.sessions.values_mut() {
            if !session.status().is_terminal() && !session.scheduled_end().is_after(now) {
                session
                    .complete()
                    .map_err(|e| DomainError::new(ErrorCode::InternalError, e.message))?;
                completed.push(session.clone());
            }
        }
        completed.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(completed)
    }
}

#[async_trait]
impl MatchRequestRepository for InMemoryStore {
    async fn save(&self, request: &MatchRequest) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let duplicate = inner.requests.values().any(|r| {
            r.session_id() == request.session_id()
                && r.requester_id() == request.requester_id()
                && r.status().is_active()
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::DuplicateRequest,
                "An active request for this session already exists",
            ));
        }
        inner.requests.insert(*request.id(), request.clone());
        Ok(())
    }

    async fn update(&self, request: &MatchRequest) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.requests.contains_key(request.id()) {
            return Err(DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Match request not found: {}", request.id()),
            )
            .with_detail("request_id", request.id().to_string()));
        }
        inner.requests.insert(*request.id(), request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<MatchRequest>, DomainError> {
        Ok(self.lock().requests.get(id).cloned())
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<MatchRequest>, DomainError> {
        let mut requests: Vec<MatchRequest> = self
            .lock()
            .requests
            .values()
            .filter(|r| r.session_id() == session_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at().cmp(b.created_at()).then(a.id().cmp(b.id())));
        Ok(requests)
    }

    async fn has_active(
        &self,
        session_id: &SessionId,
        requester_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(self.lock().requests.values().any(|r| {
            r.session_id() == session_id
                && r.requester_id() == requester_id
                && r.status().is_active()
        }))
    }

    async fn accept_claiming_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError> {
        let mut inner = self.lock();

        let mut request = inner
            .requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::RequestNotFound,
                    format!("Match request not found: {}", request_id),
                )
                .with_detail("request_id", request_id.to_string())
            })?;
        if request.status() != RequestStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot accept a {} request", request.status()),
            ));
        }

        let mut session = inner
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("Session not found: {}", session_id),
                )
                .with_detail("session_id", session_id.to_string())
            })?;

        // Both transitions validated before either is written back
        let became_full = session.claim_slot()?;
        request.accept()?;

        inner.sessions.insert(*session.id(), session);
        inner.requests.insert(*request.id(), request);
        Ok(became_full)
    }

    async fn withdraw_releasing_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError> {
        let mut inner = self.lock();

        let mut request = inner
            .requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::RequestNotFound,
                    format!("Match request not found: {}", request_id),
                )
                .with_detail("request_id", request_id.to_string())
            })?;
        if request.status() != RequestStatus::Accepted {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot release a slot for a {} request", request.status()),
            ));
        }

        let mut session = inner
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("Session not found: {}", session_id),
                )
                .with_detail("session_id", session_id.to_string())
            })?;

        let reopened = session.release_slot()?;
        request.withdraw()?;

        inner.sessions.insert(*session.id(), session);
        inner.requests.insert(*request.id(), request);
        Ok(reopened)
    }
}

#[async_trait]
impl SessionBrowser for InMemoryStore {
    async fn browse(
        &self,
        filter: &SessionFilter,
        now: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let location_needle = filter.location.as_ref().map(|l| l.to_lowercase());

        let mut sessions: Vec<Session> = self
            .lock()
            .sessions
            .values()
            .filter(|s| s.effective_status(now) == SessionStatus::Open)
            .filter(|s| match &filter.date_from {
                Some(from) => !s.date_time().is_before(from),
                None => true,
            })
            .filter(|s| match &filter.date_to {
                Some(to) => !s.date_time().is_after(to),
                None => true,
            })
            .filter(|s| match &filter.skill {
                Some(band) => s.skill_range().overlaps(band),
                None => true,
            })
            .filter(|s| match filter.intent {
                Some(intent) => s.intent() == intent,
                None => true,
            })
            .filter(|s| match &location_needle {
                Some(needle) => s.location().to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        sessions.sort_by(|a, b| a.date_time().cmp(b.date_time()).then(a.id().cmp(b.id())));
        Ok(sessions)
    }
}
