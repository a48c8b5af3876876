//! Session browse port (read side).
//!
//! Query interface for players looking for a session to join. Kept apart
//! from the write-side repository so the read path can grow its own
//! indexes and projections.

use crate::domain::foundation::{DomainError, Intent, SkillRange, Timestamp};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Filter criteria for browsing sessions.
///
/// All fields are optional; an empty filter lists every open session.
/// Skill matching is by overlap: a session is included when its band
/// shares at least one level with the filter band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilter {
    /// Only sessions starting at or after this time.
    pub date_from: Option<Timestamp>,

    /// Only sessions starting at or before this time.
    pub date_to: Option<Timestamp>,

    /// Only sessions whose skill band overlaps this one.
    pub skill: Option<SkillRange>,

    /// Only sessions with this intent.
    pub intent: Option<Intent>,

    /// Case-insensitive substring match on location.
    pub location: Option<String>,
}

impl SessionFilter {
    /// Filter with no criteria.
    pub fn any() -> Self {
        Self::default()
    }
}

/// Read-side port for browsing joinable sessions.
#[async_trait]
pub trait SessionBrowser: Send + Sync {
    /// List open sessions matching the filter, soonest start first.
    ///
    /// Only sessions that are effectively Open at `now` are returned:
    /// full, cancelled, and elapsed sessions are excluded even if the
    /// sweeper has not yet persisted their completion.
    async fn browse(
        &self,
        filter: &SessionFilter,
        now: &Timestamp,
    ) -> Result<Vec<Session>, DomainError>;
}
