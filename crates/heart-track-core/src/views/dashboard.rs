//! Latest-reading dashboard.

use serde::{Deserialize, Serialize};

use super::format_reading;
use crate::models::LatestVitals;

pub const DASHBOARD_TITLE: &str = "Heart Health Dashboard";
pub const EMPTY_DASHBOARD: &str = "No vitals logged yet.";

/// One labeled metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricCard {
    pub label: String,
    /// Formatted value, `None` when the reading lacks this field
    pub value: Option<String>,
    pub unit: Option<String>,
}

impl MetricCard {
    fn new(label: &str, value: Option<String>, unit: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.map(str::to_string),
        }
    }

    /// Text shown on the card. A missing value shows blank, never zero.
    pub fn display(&self) -> String {
        match (&self.value, &self.unit) {
            (Some(value), Some(unit)) => format!("{} {}", value, unit),
            (Some(value), None) => value.clone(),
            (None, _) => String::new(),
        }
    }
}

/// What the dashboard renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DashboardView {
    Placeholder { message: String },
    Metrics { cards: Vec<MetricCard>, optimistic: bool },
}

impl DashboardView {
    pub fn from_latest(latest: Option<&LatestVitals>) -> Self {
        let Some(latest) = latest else {
            return DashboardView::Placeholder {
                message: EMPTY_DASHBOARD.to_string(),
            };
        };

        let cards = vec![
            MetricCard::new("Heart Rate", latest.heart_rate.map(format_reading), Some("bpm")),
            MetricCard::new("Blood Pressure", latest.blood_pressure.clone(), None),
            MetricCard::new("Cholesterol", latest.cholesterol.map(format_reading), Some("mg/dL")),
            MetricCard::new("Glucose", latest.glucose.map(format_reading), Some("mg/dL")),
        ];

        DashboardView::Metrics {
            cards,
            optimistic: latest.optimistic,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DashboardView::Placeholder { .. })
    }

    /// Cards, empty for the placeholder.
    pub fn cards(&self) -> &[MetricCard] {
        match self {
            DashboardView::Metrics { cards, .. } => cards,
            DashboardView::Placeholder { .. } => &[],
        }
    }
}
