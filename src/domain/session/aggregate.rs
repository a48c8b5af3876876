//! Session aggregate entity.
//!
//! A session is the unit of booking: one creator, a scheduled court time,
//! a skill band, and a fixed number of player slots claimed by accepting
//! match requests.
//!
//! # Slot accounting
//!
//! `current_players` counts accepted participants; the creator is not
//! counted. It moves only through `claim_slot` / `release_slot`, which keep
//! it inside `0..=max_players` and keep `status` consistent (Full exactly
//! when every slot is claimed).

use crate::domain::foundation::{
    DomainError, ErrorCode, Intent, SessionId, SessionStatus, SkillRange, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Maximum length for session title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for session location.
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Supported session durations in minutes.
pub const ALLOWED_DURATIONS_MINUTES: [u32; 3] = [60, 90, 120];

/// Minimum number of player slots.
pub const MIN_PLAYERS: u32 = 2;

/// Session aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters, `location` is 1-200 characters
/// - `date_time` is in the future at creation
/// - `duration_minutes` is one of 60, 90, 120
/// - `max_players >= 2`
/// - `0 <= current_players <= max_players`
/// - `status == Full` exactly when `current_players == max_players`
///   (while non-terminal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Player who created the session and decides on requests.
    creator_id: UserId,

    /// Short human-readable title.
    title: String,

    /// Court or venue description.
    location: String,

    /// Scheduled start time.
    date_time: Timestamp,

    /// Planned length of play in minutes.
    duration_minutes: u32,

    /// What the session is organized around.
    intent: Intent,

    /// Skill band the session is open to.
    skill_range: SkillRange,

    /// Total player slots open to requesters.
    max_players: u32,

    /// Claimed slots (accepted participants, creator not counted).
    current_players: u32,

    /// Lifecycle status.
    status: SessionStatus,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session was last updated.
    updated_at: Timestamp,
}

impl Session {
    /// Create a new open session with every slot unclaimed.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title/location are empty or too long, the
    ///   start time is not in the future, the duration is unsupported, or
    ///   `max_players < 2`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        creator_id: UserId,
        title: String,
        location: String,
        date_time: Timestamp,
        duration_minutes: u32,
        intent: Intent,
        skill_range: SkillRange,
        max_players: u32,
    ) -> Result<Self, DomainError> {
        Self::validate_text("title", &title, MAX_TITLE_LENGTH)?;
        Self::validate_text("location", &location, MAX_LOCATION_LENGTH)?;

        let now = Timestamp::now();
        if !date_time.is_after(&now) {
            return Err(DomainError::validation(
                "date_time",
                "Session start must be in the future",
            ));
        }
        if !ALLOWED_DURATIONS_MINUTES.contains(&duration_minutes) {
            return Err(DomainError::validation(
                "duration",
                "Duration must be 60, 90, or 120 minutes",
            ));
        }
        if max_players < MIN_PLAYERS {
            return Err(DomainError::validation(
                "max_players",
                "Session needs at least 2 player slots",
            ));
        }

        Ok(Self {
            id,
            creator_id,
            title,
            location,
            date_time,
            duration_minutes,
            intent,
            skill_range,
            max_players,
            current_players: 0,
            status: SessionStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        creator_id: UserId,
        title: String,
        location: String,
        date_time: Timestamp,
        duration_minutes: u32,
        intent: Intent,
        skill_range: SkillRange,
        max_players: u32,
        current_players: u32,
        status: SessionStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            creator_id,
            title,
            location,
            date_time,
            duration_minutes,
            intent,
            skill_range,
            max_players,
            current_players,
            status,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the creator's user ID.
    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    /// Returns the session title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the session location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the scheduled start time.
    pub fn date_time(&self) -> &Timestamp {
        &self.date_time
    }

    /// Returns the planned duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Returns the session intent.
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Returns the skill band.
    pub fn skill_range(&self) -> &SkillRange {
        &self.skill_range
    }

    /// Returns the total number of player slots.
    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    /// Returns the number of claimed slots.
    pub fn current_players(&self) -> u32 {
        self.current_players
    }

    /// Returns the number of unclaimed slots.
    pub fn remaining_slots(&self) -> u32 {
        self.max_players - self.current_players
    }

    /// Returns the stored lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the scheduled end time.
    pub fn scheduled_end(&self) -> Timestamp {
        self.date_time.plus_minutes(self.duration_minutes as i64)
    }

    /// Returns the status as observed at `now`.
    ///
    /// A non-terminal session whose scheduled end has passed reads as
    /// Completed even before the sweeper has persisted the transition.
    pub fn effective_status(&self, now: &Timestamp) -> SessionStatus {
        if !self.status.is_terminal() && !self.scheduled_end().is_after(now) {
            SessionStatus::Completed
        } else {
            self.status
        }
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user created this session.
    pub fn is_creator(&self, user_id: &UserId) -> bool {
        &self.creator_id == user_id
    }

    /// Validates that the user may act as the session creator.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the creator
    pub fn authorize_creator(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_creator(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the session creator may perform this action",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Claim one slot for an accepted player.
    ///
    /// Returns true if the session became full.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is completed or cancelled
    /// - `CapacityExceeded` if every slot is already claimed
    pub fn claim_slot(&mut self) -> Result<bool, DomainError> {
        self.ensure_not_terminal()?;

        if self.current_players >= self.max_players {
            return Err(DomainError::new(
                ErrorCode::CapacityExceeded,
                "Session has no remaining player slots",
            ));
        }

        self.current_players += 1;
        let became_full = self.current_players == self.max_players;
        if became_full {
            self.status = SessionStatus::Full;
        }
        self.updated_at = Timestamp::now();
        Ok(became_full)
    }

    /// Release one previously claimed slot.
    ///
    /// Returns true if a full session reopened.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is completed or cancelled
    /// - `InvalidStateTransition` if no slot is claimed
    pub fn release_slot(&mut self) -> Result<bool, DomainError> {
        self.ensure_not_terminal()?;

        if self.current_players == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "No claimed slot to release",
            ));
        }

        let was_full = self.status == SessionStatus::Full;
        self.current_players -= 1;
        if was_full {
            self.status = SessionStatus::Open;
        }
        self.updated_at = Timestamp::now();
        Ok(was_full)
    }

    /// Cancel the session.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already completed or cancelled
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Cancelled) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot cancel a {} session", self.status),
            ));
        }

        self.status = SessionStatus::Cancelled;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Mark the session completed.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already completed or cancelled
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Completed) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot complete a {} session", self.status),
            ));
        }

        self.status = SessionStatus::Completed;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_not_terminal(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            Err(DomainError::new(
                ErrorCode::SessionClosed,
                format!("Session is {}", self.status),
            ))
        } else {
            Ok(())
        }
    }

    fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(
                field,
                format!("Field '{}' cannot be empty", field),
            ));
        }
        if value.chars().count() > max_len {
            return Err(DomainError::validation(
                field,
                format!("Field '{}' exceeds {} characters", field, max_len),
            ));
        }
        Ok(())
    }
}
