//! Intent value object describing what a session is for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// What kind of play a session is organized around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Competitive scored play.
    Match,
    /// Casual hitting without keeping score.
    Rally,
    /// Structured practice drills.
    Drills,
}

impl Intent {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Match => "match",
            Intent::Rally => "rally",
            Intent::Drills => "drills",
        }
    }

    /// All intents, in display order.
    pub fn all() -> [Intent; 3] {
        [Intent::Match, Intent::Rally, Intent::Drills]
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(Intent::Match),
            "rally" => Ok(Intent::Rally),
            "drills" => Ok(Intent::Drills),
            other => Err(ValidationError::invalid_format(
                "intent",
                format!("unknown intent '{}'", other),
            )),
        }
    }
}
