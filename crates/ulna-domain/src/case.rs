//! Case module - one advisory interaction, immutable once logged

use crate::report::CaseReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a case based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so log order matches id order
/// - 128-bit uniqueness with no coordination between workers
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(u128);

impl CaseId {
    /// Generate a new UUIDv7-based CaseId
    ///
    /// # Examples
    ///
    /// ```
    /// use ulna_domain::CaseId;
    ///
    /// let id = CaseId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a CaseId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use ulna_domain::CaseId;
    ///
    /// let id = CaseId::new();
    /// let parsed = CaseId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid case id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp_millis(&self) -> u64 {
        // UUIDv7: top 48 bits are the Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for CaseId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaseId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CaseId::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// The caller-supplied half of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    /// Free-text problem description (validated non-empty upstream)
    pub problem: String,

    /// Optional free-text context, e.g. "post-surgery", "acute injury"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_context: Option<String>,

    /// Optional caller identity from the request header (advisory only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

/// One logged advisory interaction
///
/// Records are append-only: written once, never updated or deleted. Each
/// record is self-contained with no relational structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Unique case identifier
    pub case_id: CaseId,

    /// When the case was handled (Unix seconds)
    pub timestamp: u64,

    /// Where the case came from ("api", "bot", "urgent_care")
    pub source: String,

    /// What the caller sent
    pub input: CaseInput,

    /// What the advisor returned
    pub output: CaseReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_id_chronological() {
        let id1 = CaseId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CaseId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp_millis() <= id2.timestamp_millis());
    }

    #[test]
    fn test_case_id_display_and_parse() {
        let id = CaseId::new();
        let id_str = id.to_string();

        // Canonical UUID strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = CaseId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_case_id_invalid_string() {
        assert!(CaseId::from_string("not-a-valid-uuid").is_err());
        assert!(CaseId::from_string("").is_err());
    }

    #[test]
    fn test_case_id_serde_as_string() {
        let id = CaseId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: CaseId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
