//! Skill level value objects on the NTRP rating scale.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// NTRP skill level, restricted to the recreational band 2.5 to 4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    #[serde(rename = "2.5")]
    Ntrp25,
    #[serde(rename = "3.0")]
    Ntrp30,
    #[serde(rename = "3.5")]
    Ntrp35,
    #[serde(rename = "4.0")]
    Ntrp40,
    #[serde(rename = "4.5")]
    Ntrp45,
}

impl SkillLevel {
    /// Creates a SkillLevel from its numeric rating, returning error for
    /// values off the supported scale.
    pub fn try_from_f32(value: f32) -> Result<Self, ValidationError> {
        Self::all()
            .into_iter()
            .find(|level| (level.value() - value).abs() < f32::EPSILON)
            .ok_or_else(|| ValidationError::out_of_range("skill", 2.5, 4.5, value as f64))
    }

    /// Returns the numeric NTRP rating.
    pub fn value(&self) -> f32 {
        match self {
            SkillLevel::Ntrp25 => 2.5,
            SkillLevel::Ntrp30 => 3.0,
            SkillLevel::Ntrp35 => 3.5,
            SkillLevel::Ntrp40 => 4.0,
            SkillLevel::Ntrp45 => 4.5,
        }
    }

    /// All levels, ascending.
    pub fn all() -> [SkillLevel; 5] {
        [
            SkillLevel::Ntrp25,
            SkillLevel::Ntrp30,
            SkillLevel::Ntrp35,
            SkillLevel::Ntrp40,
            SkillLevel::Ntrp45,
        ]
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

/// Inclusive skill band a session is open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRange {
    min: SkillLevel,
    max: SkillLevel,
}

impl SkillRange {
    /// Creates a range, returning error if min exceeds max.
    pub fn new(min: SkillLevel, max: SkillLevel) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::invalid_format(
                "skill_range",
                format!("min {} exceeds max {}", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    /// Returns the lower bound.
    pub fn min(&self) -> SkillLevel {
        self.min
    }

    /// Returns the upper bound.
    pub fn max(&self) -> SkillLevel {
        self.max
    }

    /// Returns true if the level falls inside this range.
    pub fn contains(&self, level: SkillLevel) -> bool {
        self.min <= level && level <= self.max
    }

    /// Returns true if the two ranges share at least one level.
    ///
    /// Browse filtering matches on overlap rather than containment, so a
    /// 3.0-4.0 player sees a 3.5-4.5 session.
    pub fn overlaps(&self, other: &SkillRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl fmt::Display for SkillRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_try_from_f32_accepts_supported_ratings() {
        assert_eq!(SkillLevel::try_from_f32(2.5).unwrap(), SkillLevel::Ntrp25);
        assert_eq!(SkillLevel::try_from_f32(3.0).unwrap(), SkillLevel::Ntrp30);
        assert_eq!(SkillLevel::try_from_f32(3.5).unwrap(), SkillLevel::Ntrp35);
        assert_eq!(SkillLevel::try_from_f32(4.0).unwrap(), SkillLevel::Ntrp40);
        assert_eq!(SkillLevel::try_from_f32(4.5).unwrap(), SkillLevel::Ntrp45);
    }

    #[test]
    fn skill_level_try_from_f32_rejects_off_scale_values() {
        assert!(SkillLevel::try_from_f32(2.0).is_err());
        assert!(SkillLevel::try_from_f32(2.75).is_err());
        assert!(SkillLevel::try_from_f32(5.0).is_err());
        assert!(SkillLevel::try_from_f32(-3.5).is_err());
    }

    #[test]
    fn skill_level_value_round_trips() {
        for level in SkillLevel::all() {
            assert_eq!(SkillLevel::try_from_f32(level.value()).unwrap(), level);
        }
    }

    #[test]
    fn skill_level_ordering_follows_rating() {
        assert!(SkillLevel::Ntrp25 < SkillLevel::Ntrp30);
        assert!(SkillLevel::Ntrp40 < SkillLevel::Ntrp45);
    }

    #[test]
    fn skill_level_displays_one_decimal() {
        assert_eq!(format!("{}", SkillLevel::Ntrp30), "3.0");
        assert_eq!(format!("{}", SkillLevel::Ntrp45), "4.5");
    }

    #[test]
    fn skill_level_serializes_as_rating_string() {
        assert_eq!(
            serde_json::to_string(&SkillLevel::Ntrp35).unwrap(),
            "\"3.5\""
        );
        let level: SkillLevel = serde_json::from_str("\"4.0\"").unwrap();
        assert_eq!(level, SkillLevel::Ntrp40);
    }

    #[test]
    fn skill_range_rejects_inverted_bounds() {
        let result = SkillRange::new(SkillLevel::Ntrp40, SkillLevel::Ntrp30);
        assert!(result.is_err());
    }

    #[test]
    fn skill_range_allows_single_level_band() {
        let range = SkillRange::new(SkillLevel::Ntrp35, SkillLevel::Ntrp35).unwrap();
        assert!(range.contains(SkillLevel::Ntrp35));
        assert!(!range.contains(SkillLevel::Ntrp30));
    }

    #[test]
    fn skill_range_contains_checks_inclusive_bounds() {
        let range = SkillRange::new(SkillLevel::Ntrp30, SkillLevel::Ntrp40).unwrap();
        assert!(range.contains(SkillLevel::Ntrp30));
        assert!(range.contains(SkillLevel::Ntrp35));
        assert!(range.contains(SkillLevel::Ntrp40));
        assert!(!range.contains(SkillLevel::Ntrp25));
        assert!(!range.contains(SkillLevel::Ntrp45));
    }

    #[test]
    fn skill_range_overlaps_on_shared_level() {
        let a = SkillRange::new(SkillLevel::Ntrp30, SkillLevel::Ntrp40).unwrap();
        let b = SkillRange::new(SkillLevel::Ntrp40, SkillLevel::Ntrp45).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn skill_range_overlap_does_not_require_containment() {
        let player = SkillRange::new(SkillLevel::Ntrp30, SkillLevel::Ntrp40).unwrap();
        let session = SkillRange::new(SkillLevel::Ntrp35, SkillLevel::Ntrp45).unwrap();
        assert!(player.overlaps(&session));
    }

    #[test]
    fn skill_range_disjoint_bands_do_not_overlap() {
        let a = SkillRange::new(SkillLevel::Ntrp25, SkillLevel::Ntrp30).unwrap();
        let b = SkillRange::new(SkillLevel::Ntrp40, SkillLevel::Ntrp45).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }
}
