//! The single most-recent reading shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RemoteVitalsDocument, RemoteVitalsInput};

/// Latest reading as materialized by the dashboard.
///
/// Every field is optional: a field absent from the source renders blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatestVitals {
    pub heart_rate: Option<f64>,
    pub blood_pressure: Option<String>,
    pub cholesterol: Option<f64>,
    pub glucose: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// True when built from the form's own values before server confirmation
    #[serde(default)]
    pub optimistic: bool,
}

impl From<RemoteVitalsDocument> for LatestVitals {
    fn from(doc: RemoteVitalsDocument) -> Self {
        Self {
            heart_rate: Some(doc.heart_rate),
            blood_pressure: Some(doc.blood_pressure),
            cholesterol: doc.cholesterol,
            glucose: doc.glucose,
            timestamp: Some(doc.timestamp),
            optimistic: false,
        }
    }
}

impl From<RemoteVitalsInput> for LatestVitals {
    fn from(input: RemoteVitalsInput) -> Self {
        Self {
            heart_rate: Some(input.heart_rate),
            blood_pressure: Some(input.blood_pressure),
            cholesterol: input.cholesterol,
            glucose: input.glucose,
            timestamp: Some(input.timestamp),
            optimistic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_is_optimistic() {
        let input = RemoteVitalsInput::new(80.0, "130/85".into(), Some(190.0), Some(95.0));
        let latest = LatestVitals::from(input.clone());

        assert!(latest.optimistic);
        assert_eq!(latest.heart_rate, Some(80.0));
        assert_eq!(latest.timestamp, Some(input.timestamp));
    }

    #[test]
    fn test_from_document_keeps_missing_fields() {
        let doc = RemoteVitalsDocument {
            id: "doc-1".into(),
            heart_rate: 64.0,
            blood_pressure: "118/76".into(),
            cholesterol: None,
            glucose: Some(101.0),
            timestamp: Utc::now(),
        };
        let latest = LatestVitals::from(doc);

        assert!(!latest.optimistic);
        assert_eq!(latest.cholesterol, None);
        assert_eq!(latest.glucose, Some(101.0));
    }
}
