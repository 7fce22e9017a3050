//! Summary statistics over a history.

use serde::{Deserialize, Serialize};

use crate::models::LocalVitalsRecord;

/// Headline numbers for the history view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    /// Heart rate of the newest record
    pub latest_bpm: f64,
    /// Mean heart rate, rounded to one decimal
    pub average_bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub count: usize,
}

impl SummaryStats {
    /// Compute stats over a newest-first history. `None` when empty.
    pub fn from_records(records: &[LocalVitalsRecord]) -> Option<Self> {
        let latest = records.first()?;

        let rates = records.iter().map(|r| r.heart_rate);
        let sum: f64 = rates.clone().sum();
        let min = rates.clone().fold(f64::INFINITY, f64::min);
        let max = rates.fold(f64::NEG_INFINITY, f64::max);
        let average = sum / records.len() as f64;

        Some(Self {
            latest_bpm: latest.heart_rate,
            average_bpm: (average * 10.0).round() / 10.0,
            min_bpm: min,
            max_bpm: max,
            count: records.len(),
        })
    }
}
