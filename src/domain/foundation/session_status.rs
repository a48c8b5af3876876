//! SessionStatus enum for the session lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Lifecycle status of a bookable session.
///
/// Valid transitions:
/// - Open -> Full (last slot claimed)
/// - Open -> Cancelled (creator cancels)
/// - Open -> Completed (scheduled end passes)
/// - Full -> Open (an accepted player withdraws)
/// - Full -> Cancelled (creator cancels)
/// - Full -> Completed (scheduled end passes)
///
/// Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Open,
    Full,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    /// Returns true if the session still accepts join requests.
    pub fn accepts_requests(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }

    /// Validates a transition from this status to another.
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Open, Full)
                | (Open, Cancelled)
                | (Open, Completed)
                | (Full, Open)
                | (Full, Cancelled)
                | (Full, Completed)
        )
    }

    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Full => "full",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SessionStatus::Open),
            "full" => Ok(SessionStatus::Full),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown session status '{}'", other),
            )),
        }
    }
}
