//! Confidence level module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumerated confidence in a suggested diagnosis
///
/// The derivation pipeline only ever emits one of these three values,
/// whether the report came from the model path or the rule path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Weak or generic match
    Low,
    /// Plausible single match
    Medium,
    /// Specific, well-supported match
    High,
}

impl ConfidenceLevel {
    /// Numeric value used by fuzzy fusion (low=0.2, medium=0.5, high=0.85)
    pub fn as_numeric(&self) -> f64 {
        match self {
            ConfidenceLevel::Low => 0.2,
            ConfidenceLevel::Medium => 0.5,
            ConfidenceLevel::High => 0.85,
        }
    }

    /// Defuzzify a fused numeric confidence back to a level
    ///
    /// Thresholds: >= 0.7 high, >= 0.35 medium, otherwise low. Values are
    /// clamped, so any float maps to a valid level.
    pub fn from_numeric(x: f64) -> Self {
        if x >= 0.7 {
            ConfidenceLevel::High
        } else if x >= 0.35 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(format!("unknown confidence level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_mapping() {
        assert_eq!(ConfidenceLevel::Low.as_numeric(), 0.2);
        assert_eq!(ConfidenceLevel::Medium.as_numeric(), 0.5);
        assert_eq!(ConfidenceLevel::High.as_numeric(), 0.85);
    }

    #[test]
    fn test_defuzzify_thresholds() {
        assert_eq!(ConfidenceLevel::from_numeric(0.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_numeric(0.34), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_numeric(0.35), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_numeric(0.69), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_numeric(0.7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_numeric(1.0), ConfidenceLevel::High);
    }

    #[test]
    fn test_parse() {
        assert_eq!("high".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::High);
        assert_eq!(" Medium ".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::Medium);
        assert!("certain".parse::<ConfidenceLevel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ConfidenceLevel::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: ConfidenceLevel = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, ConfidenceLevel::Low);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: round-tripping a level through its numeric value is lossless
        #[test]
        fn test_numeric_roundtrip(level in prop_oneof![
            Just(ConfidenceLevel::Low),
            Just(ConfidenceLevel::Medium),
            Just(ConfidenceLevel::High),
        ]) {
            prop_assert_eq!(ConfidenceLevel::from_numeric(level.as_numeric()), level);
        }

        /// Property: defuzzification is total over reasonable inputs
        #[test]
        fn test_defuzzify_total(x in -10.0f64..10.0) {
            // No panic, and higher inputs never map to lower levels
            let level = ConfidenceLevel::from_numeric(x);
            let higher = ConfidenceLevel::from_numeric(x + 1.0);
            prop_assert!(higher.as_numeric() >= level.as_numeric());
        }
    }
}
