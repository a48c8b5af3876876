//! RequestStatus enum for the match-request decision workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Status of a match request.
///
/// Valid transitions:
/// - Pending -> Accepted (creator accepts, slot claimed)
/// - Pending -> Declined (creator declines)
/// - Pending -> Withdrawn (requester withdraws before decision)
/// - Accepted -> Withdrawn (requester gives up a claimed slot)
///
/// Declined and Withdrawn are terminal; Accepted terminates only via
/// withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Withdrawn,
}

impl RequestStatus {
    /// Returns true while the request counts toward the one-active-request
    /// rule (at most one pending or accepted request per user per session).
    pub fn is_active(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Accepted)
    }

    /// Returns true if the request holds a claimed slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, RequestStatus::Accepted)
    }

    /// Validates a transition from this status to another.
    pub fn can_transition_to(&self, target: &RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, target),
            (Pending, Accepted) | (Pending, Declined) | (Pending, Withdrawn) | (Accepted, Withdrawn)
        )
    }

    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
            RequestStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "declined" => Ok(RequestStatus::Declined),
            "withdrawn" => Ok(RequestStatus::Withdrawn),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown request status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn pending_and_accepted_are_active() {
        assert!(RequestStatus::Pending.is_active());
        assert!(RequestStatus::Accepted.is_active());
        assert!(!RequestStatus::Declined.is_active());
        assert!(!RequestStatus::Withdrawn.is_active());
    }

    #[test]
    fn only_accepted_holds_a_slot() {
        assert!(RequestStatus::Accepted.holds_slot());
        assert!(!RequestStatus::Pending.holds_slot());
        assert!(!RequestStatus::Declined.holds_slot());
        assert!(!RequestStatus::Withdrawn.holds_slot());
    }

    #[test]
    fn pending_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(&RequestStatus::Accepted));
        assert!(RequestStatus::Pending.can_transition_to(&RequestStatus::Declined));
        assert!(RequestStatus::Pending.can_transition_to(&RequestStatus::Withdrawn));
        assert!(!RequestStatus::Pending.can_transition_to(&RequestStatus::Pending));
    }

    #[test]
    fn accepted_can_only_withdraw() {
        assert!(RequestStatus::Accepted.can_transition_to(&RequestStatus::Withdrawn));
        assert!(!RequestStatus::Accepted.can_transition_to(&RequestStatus::Pending));
        assert!(!RequestStatus::Accepted.can_transition_to(&RequestStatus::Declined));
    }

    #[test]
    fn declined_and_withdrawn_are_terminal() {
        for target in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Declined,
            RequestStatus::Withdrawn,
        ] {
            assert!(!RequestStatus::Declined.can_transition_to(&target));
            assert!(!RequestStatus::Withdrawn.can_transition_to(&target));
        }
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Withdrawn).unwrap(),
            "\"withdrawn\""
        );
    }

    #[test]
    fn round_trips_through_storage_string() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Declined,
            RequestStatus::Withdrawn,
        ] {
            let parsed: RequestStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn from_str_rejects_unknown_status() {
        assert!("expired".parse::<RequestStatus>().is_err());
    }
}
