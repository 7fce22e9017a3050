//! Export of the local tracker history.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::models::LocalVitalsRecord;

/// Snapshot of the local history for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    /// Export timestamp
    pub exported_at: String,
    /// Records, newest first
    pub records: Vec<LocalVitalsRecord>,
}

impl HistoryExport {
    pub fn new(records: &[LocalVitalsRecord]) -> Self {
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            records: records.to_vec(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("id,date,heart_rate,blood_pressure,notes\n");

        for record in &self.records {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                record.id,
                record.date.to_rfc3339(),
                record.heart_rate,
                escape_csv(&record.blood_pressure),
                escape_csv(record.notes.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}
