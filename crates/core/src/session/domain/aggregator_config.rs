use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_PERCENT_PRECISION, DEFAULT_WINDOW_CAPACITY, EMPTY_LABEL, MAX_PERCENT_PRECISION,
    UNKNOWN_LABEL,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window capacity must be at least 1, got {0}")]
    InvalidWindowCapacity(usize),
    #[error("percent precision must be at most {max} decimal places, got {got}")]
    InvalidPrecision { got: u32, max: u32 },
}

/// Tunables for a [`SessionAggregator`](super::session_aggregator::SessionAggregator).
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub window_capacity: usize,
    pub percent_precision: u32,
    pub unknown_label: String,
    pub empty_label: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            percent_precision: DEFAULT_PERCENT_PRECISION,
            unknown_label: UNKNOWN_LABEL.to_string(),
            empty_label: EMPTY_LABEL.to_string(),
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(ConfigError::InvalidWindowCapacity(self.window_capacity));
        }
        if self.percent_precision > MAX_PERCENT_PRECISION {
            return Err(ConfigError::InvalidPrecision {
                got: self.percent_precision,
                max: MAX_PERCENT_PRECISION,
            });
        }
        Ok(())
    }
}
