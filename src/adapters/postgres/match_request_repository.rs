//! PostgreSQL implementation of MatchRequestRepository.
//!
//! The accept/withdraw operations lock the live session row (`FOR
//! UPDATE`) inside a transaction, run the domain transitions against the
//! locked state, and write both rows back before committing. Concurrent
//! accepts for the last slot therefore serialize on the row lock and
//! exactly one can succeed.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, RequestId, RequestStatus, SessionId, UserId,
};
use crate::domain::match_request::MatchRequest;
use crate::domain::session::Session;
use crate::ports::MatchRequestRepository;

use super::row_mapping::{db_error, row_to_request, row_to_session};

/// PostgreSQL implementation of MatchRequestRepository.
#[derive(Clone)]
pub struct PostgresMatchRequestRepository {
    pool: PgPool,
}

impl PostgresMatchRequestRepository {
    /// Creates a new PostgresMatchRequestRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock and load the session row inside the given transaction.
    async fn lock_session(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session_id: &SessionId,
    ) -> Result<Session, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, creator_id, title, location, date_time, duration_minutes,
                   intent, skill_min, skill_max, max_players, current_players,
                   status, created_at, updated_at
            FROM sessions WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to lock session", e))?
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session_id),
            )
            .with_detail("session_id", session_id.to_string())
        })?;

        row_to_session(&row)
    }

    /// Lock and load the request row inside the given transaction.
    async fn lock_request(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        request_id: &RequestId,
    ) -> Result<MatchRequest, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, requester_id, status, message, created_at, updated_at
            FROM match_requests WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to lock match request", e))?
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Match request not found: {}", request_id),
            )
            .with_detail("request_id", request_id.to_string())
        })?;

        row_to_request(&row)
    }

    async fn write_session(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session: &Session,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE sessions SET current_players = $2, status = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.current_players() as i32)
        .bind(session.status().as_str())
        .bind(session.updated_at().as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to write session slot change", e))?;

        Ok(())
    }

    async fn write_request(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        request: &MatchRequest,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE match_requests SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.status().as_str())
        .bind(request.updated_at().as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to write request transition", e))?;

        Ok(())
    }
}

#[async_trait]
impl MatchRequestRepository for PostgresMatchRequestRepository {
    async fn save(&self, request: &MatchRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO match_requests (
                id, session_id, requester_id, status, message, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.session_id().as_uuid())
        .bind(request.requester_id().as_str())
        .bind(request.status().as_str())
        .bind(request.message())
        .bind(request.created_at().as_datetime())
        .bind(request.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The partial unique index on (session_id, requester_id)
            // rejects a second active request from the same player
            let is_duplicate = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if is_duplicate {
                DomainError::new(
                    ErrorCode::DuplicateRequest,
                    format!(
                        "User {} already has an active request for session {}",
                        request.requester_id(),
                        request.session_id()
                    ),
                )
            } else {
                db_error("Failed to insert match request", e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, request: &MatchRequest) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE match_requests SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.status().as_str())
        .bind(request.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update match request", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Match request not found: {}", request.id()),
            )
            .with_detail("request_id", request.id().to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<MatchRequest>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, requester_id, status, message, created_at, updated_at
            FROM match_requests WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch match request", e))?;

        match row {
            Some(row) => Ok(Some(row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<MatchRequest>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, requester_id, status, message, created_at, updated_at
            FROM match_requests WHERE session_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch requests for session", e))?;

        rows.iter().map(row_to_request).collect()
    }

    async fn has_active(
        &self,
        session_id: &SessionId,
        requester_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM match_requests
            WHERE session_id = $1 AND requester_id = $2
              AND status IN ('pending', 'accepted')
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(requester_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check for active request", e))?;

        Ok(result.0 > 0)
    }

    async fn accept_claiming_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let mut request = Self::lock_request(&mut tx, request_id).await?;
        if request.status() != RequestStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot accept a {} request", request.status()),
            ));
        }

        let mut session = Self::lock_session(&mut tx, session_id).await?;

        // Both transitions validated before either is written back
        let became_full = session.claim_slot()?;
        request.accept()?;

        Self::write_session(&mut tx, &session).await?;
        Self::write_request(&mut tx, &request).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit accept", e))?;

        Ok(became_full)
    }

    async fn withdraw_releasing_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let mut request = Self::lock_request(&mut tx, request_id).await?;
        if request.status() != RequestStatus::Accepted {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot release a slot for a {} request", request.status()),
            ));
        }

        let mut session = Self::lock_session(&mut tx, session_id).await?;

        let reopened = session.release_slot()?;
        request.withdraw()?;

        Self::write_session(&mut tx, &session).await?;
        Self::write_request(&mut tx, &request).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit withdrawal", e))?;

        Ok(reopened)
    }
}
