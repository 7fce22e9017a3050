//! Records kept by the local-only tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vitals observation persisted in the local cache.
///
/// Serialized with the camelCase keys the cached JSON array uses
/// (`id`, `heartRate`, `bloodPressure`, `date`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalVitalsRecord {
    /// Generation-time id (epoch milliseconds, unique per tracker)
    pub id: i64,
    /// Heart rate in beats per minute
    pub heart_rate: f64,
    /// Free-text blood pressure, e.g. "120/80"
    pub blood_pressure: String,
    /// Client clock at submission
    pub date: DateTime<Utc>,
    /// Symptoms, medication, anything else worth noting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LocalVitalsRecord {
    /// Create a record stamped with the current client time.
    ///
    /// `previous_id` is the id of the newest record already held; the new id
    /// is bumped past it when two submissions land in the same millisecond.
    pub fn new(
        heart_rate: f64,
        blood_pressure: String,
        notes: Option<String>,
        previous_id: Option<i64>,
    ) -> Self {
        let date = Utc::now();
        Self {
            id: next_local_id(date.timestamp_millis(), previous_id),
            heart_rate,
            blood_pressure,
            date,
            notes,
        }
    }
}

/// Values captured by the local form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalVitalsInput {
    pub heart_rate: f64,
    pub blood_pressure: String,
    pub notes: Option<String>,
}

impl LocalVitalsInput {
    /// Turn the input into a record following `previous_id`.
    pub fn into_record(self, previous_id: Option<i64>) -> LocalVitalsRecord {
        LocalVitalsRecord::new(self.heart_rate, self.blood_pressure, self.notes, previous_id)
    }
}

/// Pick an id from the clock, never reusing or going below `previous_id`.
///
/// A `previous_id` of `i64::MAX` (only reachable through a hand-edited cache)
/// cannot be bumped; the clock value is used instead.
pub fn next_local_id(now_millis: i64, previous_id: Option<i64>) -> i64 {
    match previous_id {
        Some(prev) if prev >= now_millis => prev.checked_add(1).unwrap_or(now_millis),
        _ => now_millis,
    }
}
