//! Session processing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the session processor
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Generation deadline in seconds; exceeding it marks the session FAILED
    #[serde(default = "default_processing_timeout")]
    pub processing_timeout_secs: u64,
}

impl DispatchConfig {
    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.processing_timeout_secs == 0 {
            return Err(ValidationError::InvalidProcessingTimeout);
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            processing_timeout_secs: default_processing_timeout(),
        }
    }
}

fn default_processing_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_five_minutes() {
        assert_eq!(
            DispatchConfig::default().processing_timeout(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = DispatchConfig {
            processing_timeout_secs: 0,
        };
        assert!(config.validate().is_err());
    }
}
