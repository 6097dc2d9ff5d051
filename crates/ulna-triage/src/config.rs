//! Configuration for the Advisor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the derivation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Maximum time for a single model call (seconds)
    pub model_timeout_secs: u64,

    /// Weight of the clinical result when fusing with literature evidence
    pub clinical_weight: f64,
}

impl TriageConfig {
    /// Get the model timeout as a Duration
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_timeout_secs == 0 {
            return Err("model_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.clinical_weight) {
            return Err("clinical_weight must be in [0, 1]".to_string());
        }
        Ok(())
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            model_timeout_secs: 30,
            clinical_weight: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TriageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = TriageConfig {
            model_timeout_secs: 0,
            ..TriageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_weight() {
        let config = TriageConfig {
            clinical_weight: 1.5,
            ..TriageConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
