//! PostgreSQL implementation of SessionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp, UserId};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

use super::row_mapping::{db_error, row_to_session};

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new PostgresSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SESSION_COLUMNS: &str = "id, creator_id, title, location, date_time, duration_minutes, \
     intent, skill_min, skill_max, max_players, current_players, status, created_at, updated_at";

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, creator_id, title, location, date_time, duration_minutes,
                intent, skill_min, skill_max, max_players, current_players,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.creator_id().as_str())
        .bind(session.title())
        .bind(session.location())
        .bind(session.date_time().as_datetime())
        .bind(session.duration_minutes() as i32)
        .bind(session.intent().as_str())
        .bind(session.skill_range().min().value())
        .bind(session.skill_range().max().value())
        .bind(session.max_players() as i32)
        .bind(session.current_players() as i32)
        .bind(session.status().as_str())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert session", e))?;

        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                title = $2,
                location = $3,
                date_time = $4,
                duration_minutes = $5,
                intent = $6,
                skill_min = $7,
                skill_max = $8,
                max_players = $9,
                current_players = $10,
                status = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.title())
        .bind(session.location())
        .bind(session.date_time().as_datetime())
        .bind(session.duration_minutes() as i32)
        .bind(session.intent().as_str())
        .bind(session.skill_range().min().value())
        .bind(session.skill_range().max().value())
        .bind(session.max_players() as i32)
        .bind(session.current_players() as i32)
        .bind(session.status().as_str())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
            .with_detail("session_id", session.id().to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch session", e))?;

        match row {
            Some(row) => Ok(Some(row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_creator(&self, creator_id: &UserId) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE creator_id = $1 ORDER BY date_time DESC",
            SESSION_COLUMNS
        ))
        .bind(creator_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch sessions by creator", e))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn complete_elapsed(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            UPDATE sessions SET
                status = 'completed',
                updated_at = $1
            WHERE status IN ('open', 'full')
              AND date_time + make_interval(mins => duration_minutes) <= $1
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to complete elapsed sessions", e))?;

        rows.iter().map(row_to_session).collect()
    }
}
