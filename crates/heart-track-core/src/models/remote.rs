//! Documents held by the remote vitals collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-side values for a new remote document.
///
/// `timestamp` is the client clock; the store replaces it with server time on write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVitalsInput {
    pub heart_rate: f64,
    pub blood_pressure: String,
    pub cholesterol: Option<f64>,
    pub glucose: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl RemoteVitalsInput {
    /// Create an input stamped with the current client time.
    pub fn new(
        heart_rate: f64,
        blood_pressure: String,
        cholesterol: Option<f64>,
        glucose: Option<f64>,
    ) -> Self {
        Self {
            heart_rate,
            blood_pressure,
            cholesterol,
            glucose,
            timestamp: Utc::now(),
        }
    }
}

/// A stored document, as returned by the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVitalsDocument {
    /// Store-assigned document id
    pub id: String,
    pub heart_rate: f64,
    pub blood_pressure: String,
    pub cholesterol: Option<f64>,
    pub glucose: Option<f64>,
    /// Server-assigned write time
    pub timestamp: DateTime<Utc>,
}
