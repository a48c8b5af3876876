//! PostgreSQL implementation of the SessionBrowser read side.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::session::Session;
use crate::ports::{SessionBrowser, SessionFilter};

use super::row_mapping::{db_error, row_to_session};

/// PostgreSQL implementation of SessionBrowser.
///
/// Sessions whose scheduled end has passed are excluded in SQL even when
/// the completion sweeper has not yet persisted their terminal status.
#[derive(Clone)]
pub struct PostgresSessionBrowser {
    pool: PgPool,
}

impl PostgresSessionBrowser {
    /// Creates a new PostgresSessionBrowser.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so filter text matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl SessionBrowser for PostgresSessionBrowser {
    async fn browse(
        &self,
        filter: &SessionFilter,
        now: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, creator_id, title, location, date_time, duration_minutes, \
             intent, skill_min, skill_max, max_players, current_players, \
             status, created_at, updated_at \
             FROM sessions WHERE status = 'open' \
             AND date_time + make_interval(mins => duration_minutes) > ",
        );
        query.push_bind(now.as_datetime());

        if let Some(date_from) = &filter.date_from {
            query.push(" AND date_time >= ");
            query.push_bind(date_from.as_datetime());
        }

        if let Some(date_to) = &filter.date_to {
            query.push(" AND date_time <= ");
            query.push_bind(date_to.as_datetime());
        }

        if let Some(skill) = &filter.skill {
            // Overlap, not containment: the bands need only share a level
            query.push(" AND skill_min <= ");
            query.push_bind(skill.max().value());
            query.push(" AND skill_max >= ");
            query.push_bind(skill.min().value());
        }

        if let Some(intent) = filter.intent {
            query.push(" AND intent = ");
            query.push_bind(intent.as_str());
        }

        if let Some(location) = &filter.location {
            query.push(" AND location ILIKE ");
            query.push_bind(format!("%{}%", escape_like(location)));
        }

        query.push(" ORDER BY date_time ASC, id ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to browse sessions", e))?;

        rows.iter().map(row_to_session).collect()
    }
}
