//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Intent, RequestStatus, SessionStatus, SkillLevel, SkillRange, Timestamp,
};
use crate::domain::match_request::MatchRequest;
use crate::domain::session::Session;
use crate::ports::SessionFilter;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub location: String,
    pub date_time: Timestamp,
    pub duration_minutes: u32,
    pub intent: Intent,
    pub skill_min: SkillLevel,
    pub skill_max: SkillLevel,
    pub max_players: u32,
}

/// Query parameters for browsing sessions.
///
/// Skill bounds arrive as NTRP numbers; a single bound stands for a
/// one-level band.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseSessionsParams {
    #[serde(default)]
    pub date_from: Option<Timestamp>,
    #[serde(default)]
    pub date_to: Option<Timestamp>,
    #[serde(default)]
    pub skill_min: Option<f32>,
    #[serde(default)]
    pub skill_max: Option<f32>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub location: Option<String>,
}

impl BrowseSessionsParams {
    /// Convert to the domain filter.
    ///
    /// Returns an error message suitable for a 400 response when a skill
    /// bound is not a recognized NTRP level.
    pub fn into_filter(self) -> Result<SessionFilter, String> {
        let skill = match (self.skill_min, self.skill_max) {
            (None, None) => None,
            (min, max) => {
                let min = min
                    .or(max)
                    .map(SkillLevel::try_from_f32)
                    .transpose()
                    .map_err(|e| e.to_string())?;
                let max = self
                    .skill_max
                    .or(self.skill_min)
                    .map(SkillLevel::try_from_f32)
                    .transpose()
                    .map_err(|e| e.to_string())?;
                match (min, max) {
                    (Some(min), Some(max)) => {
                        Some(SkillRange::new(min, max).map_err(|e| e.to_string())?)
                    }
                    _ => None,
                }
            }
        };

        Ok(SessionFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            skill,
            intent: self.intent,
            location: self.location,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub location: String,
    pub date_time: String,
    pub duration_minutes: u32,
    pub intent: Intent,
    pub skill_min: SkillLevel,
    pub skill_max: SkillLevel,
    pub max_players: u32,
    pub current_players: u32,
    pub remaining_slots: u32,
    pub status: SessionStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl SessionResponse {
    /// Session view with the status as observed at `now`.
    ///
    /// An elapsed open/full session reads as completed even before the
    /// sweeper has persisted the transition.
    pub fn as_of(session: &Session, now: &Timestamp) -> Self {
        Self {
            status: session.effective_status(now),
            ..Self::from(session)
        }
    }
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            creator_id: session.creator_id().to_string(),
            title: session.title().to_string(),
            location: session.location().to_string(),
            date_time: session.date_time().as_datetime().to_rfc3339(),
            duration_minutes: session.duration_minutes(),
            intent: session.intent(),
            skill_min: session.skill_range().min(),
            skill_max: session.skill_range().max(),
            max_players: session.max_players(),
            current_players: session.current_players(),
            remaining_slots: session.remaining_slots(),
            status: session.status(),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            updated_at: session.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Match request view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RequestResponse {
    pub id: String,
    pub session_id: String,
    pub requester_id: String,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&MatchRequest> for RequestResponse {
    fn from(request: &MatchRequest) -> Self {
        Self {
            id: request.id().to_string(),
            session_id: request.session_id().to_string(),
            requester_id: request.requester_id().to_string(),
            status: request.status(),
            message: request.message().map(str::to_string),
            created_at: request.created_at().as_datetime().to_rfc3339(),
            updated_at: request.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Session detail with its request list.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub requests: Vec<RequestResponse>,
}
