//! Check scores.

use serde::{Serialize, Serializer};

/// Outcome of a single check.
///
/// Each score carries a numeric weight used for report aggregation.
/// [`Score::Info`] is a sentinel: it never contributes to a report's
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    /// Everything is in order.
    Pass,
    /// Something should be looked at.
    Warn,
    /// Something is wrong.
    Fail,
    /// Informational only, excluded from aggregation.
    Info,
}

impl Score {
    /// Numeric weight of this score.
    pub fn weight(self) -> i64 {
        match self {
            Score::Pass => 2,
            Score::Warn => 1,
            Score::Fail => 0,
            Score::Info => -1,
        }
    }

    /// The largest weight a contributing check can reach.
    pub fn max_weight() -> i64 {
        Score::Pass.weight()
    }

    /// Whether this score counts toward a report's percentage.
    pub fn contributes(self) -> bool {
        self != Score::Info
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Pass => write!(f, "pass"),
            Score::Warn => write!(f, "warn"),
            Score::Fail => write!(f, "fail"),
            Score::Info => write!(f, "info"),
        }
    }
}

// Consumers of the JSON output read the score as its numeric weight.
impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_ordered() {
        assert!(Score::Pass.weight() > Score::Warn.weight());
        assert!(Score::Warn.weight() > Score::Fail.weight());
        assert_eq!(Score::max_weight(), Score::Pass.weight());
    }

    #[test]
    fn info_does_not_contribute() {
        assert!(!Score::Info.contributes());
        assert!(Score::Fail.contributes());
        assert!(Score::Pass.contributes());
    }

    #[test]
    fn score_display() {
        assert_eq!(format!("{}", Score::Pass), "pass");
        assert_eq!(format!("{}", Score::Warn), "warn");
        assert_eq!(format!("{}", Score::Fail), "fail");
        assert_eq!(format!("{}", Score::Info), "info");
    }

    #[test]
    fn score_serializes_as_weight() {
        assert_eq!(serde_json::to_string(&Score::Pass).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Score::Info).unwrap(), "-1");
    }
}
