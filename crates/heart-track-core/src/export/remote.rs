//! Export of the remote collection history.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::models::RemoteVitalsDocument;

/// Snapshot of remote documents for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteHistoryExport {
    pub exported_at: String,
    /// Documents, newest first
    pub documents: Vec<RemoteVitalsDocument>,
}

impl RemoteHistoryExport {
    pub fn new(documents: Vec<RemoteVitalsDocument>) -> Self {
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            documents,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format. Missing readings export as empty cells.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("id,timestamp,heart_rate,blood_pressure,cholesterol,glucose\n");

        for doc in &self.documents {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                escape_csv(&doc.id),
                doc.timestamp.to_rfc3339(),
                doc.heart_rate,
                escape_csv(&doc.blood_pressure),
                doc.cholesterol.map(|v| v.to_string()).unwrap_or_default(),
                doc.glucose.map(|v| v.to_string()).unwrap_or_default(),
            ));
        }

        csv
    }
}
