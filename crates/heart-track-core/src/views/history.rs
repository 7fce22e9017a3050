//! History table and heart-rate trend chart for the local tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format_reading;
use crate::models::LocalVitalsRecord;

pub const HISTORY_HEADERS: [&str; 4] = ["Date", "Heart Rate", "Blood Pressure", "Notes"];

/// One table row, already formatted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub heart_rate: String,
    pub blood_pressure: String,
    pub notes: String,
}

/// History table in stored order (newest first).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryTable {
    pub rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn from_records(records: &[LocalVitalsRecord]) -> Self {
        let rows = records
            .iter()
            .map(|r| HistoryRow {
                id: r.id,
                date: r.date.format("%Y-%m-%d %H:%M").to_string(),
                heart_rate: format!("{} bpm", format_reading(r.heart_rate)),
                blood_pressure: r.blood_pressure.clone(),
                notes: r.notes.clone().unwrap_or_default(),
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One point on the trend line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub heart_rate: f64,
}

/// Heart rate over time, oldest point first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendChart {
    pub points: Vec<TrendPoint>,
}

impl TrendChart {
    pub const TITLE: &'static str = "Heart Rate Over Time";
    pub const X_LABEL: &'static str = "Time";
    pub const Y_LABEL: &'static str = "BPM";

    /// Build from a newest-first history.
    pub fn from_records(records: &[LocalVitalsRecord]) -> Self {
        let points = records
            .iter()
            .rev()
            .map(|r| TrendPoint {
                date: r.date,
                heart_rate: r.heart_rate,
            })
            .collect();
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: i64, heart_rate: f64, hour: u32) -> LocalVitalsRecord {
        LocalVitalsRecord {
            id,
            heart_rate,
            blood_pressure: "120/80".into(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_table_keeps_stored_order() {
        let records = vec![record(3, 90.0, 12), record(2, 80.0, 10), record(1, 70.0, 8)];
        let table = HistoryTable::from_records(&records);

        let ids: Vec<i64> = table.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(table.rows[0].heart_rate, "90 bpm");
        assert_eq!(table.rows[0].date, "2024-03-01 12:00");
    }

    #[test]
    fn test_chart_is_chronological() {
        let records = vec![record(3, 90.0, 12), record(2, 80.0, 10), record(1, 70.0, 8)];
        let chart = TrendChart::from_records(&records);

        let rates: Vec<f64> = chart.points.iter().map(|p| p.heart_rate).collect();
        assert_eq!(rates, vec![70.0, 80.0, 90.0]);
        assert!(chart.points[0].date < chart.points[2].date);
    }

    #[test]
    fn test_empty_history() {
        assert!(HistoryTable::from_records(&[]).is_empty());
        assert!(TrendChart::from_records(&[]).points.is_empty());
    }
}
