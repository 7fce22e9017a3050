//! Heart-rate alert thresholds.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};
use crate::models::LocalVitalsRecord;

/// Alert level of a single reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    High,
    Low,
    Normal,
}

/// Inclusive bounds outside which a heart rate raises an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    pub high_bpm: f64,
    pub low_bpm: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_bpm: 120.0,
            low_bpm: 40.0,
        }
    }
}

impl AlertThresholds {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.low_bpm < self.high_bpm) {
            return Err(ConfigError::Invalid(format!(
                "lowBpm ({}) must be below highBpm ({})",
                self.low_bpm, self.high_bpm
            )));
        }
        Ok(())
    }

    /// Classify a heart rate. Both bounds are inclusive.
    pub fn classify(&self, heart_rate: f64) -> AlertLevel {
        if heart_rate >= self.high_bpm {
            AlertLevel::High
        } else if heart_rate <= self.low_bpm {
            AlertLevel::Low
        } else {
            AlertLevel::Normal
        }
    }

    /// User-facing warning for a reading, `None` when normal.
    pub fn message(&self, heart_rate: f64) -> Option<String> {
        match self.classify(heart_rate) {
            AlertLevel::High => Some(format!(
                "High heart rate detected: {} bpm. Consider contacting a doctor.",
                heart_rate
            )),
            AlertLevel::Low => Some(format!(
                "Low heart rate detected: {} bpm. Consider contacting a doctor.",
                heart_rate
            )),
            AlertLevel::Normal => None,
        }
    }

    /// Records outside the thresholds, in the order given.
    pub fn recent_alerts<'a>(&self, records: &'a [LocalVitalsRecord]) -> Vec<&'a LocalVitalsRecord> {
        records
            .iter()
            .filter(|r| self.classify(r.heart_rate) != AlertLevel::Normal)
            .collect()
    }
}
