//! Series shapes consumed by the dashboard.

use serde::Serialize;

use crate::inference::domain::CallCategory;

/// One category's counts across the horizon, for stacked charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySeries {
    pub category: CallCategory,
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// A category's share of all calls over the horizon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: CallCategory,
    pub label: &'static str,
    pub count: f64,
    /// Fraction of the grand total; 0 when no calls are predicted.
    pub share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow {
    pub call_category: &'static str,
    pub predicted_count: f64,
}

/// Single-hour table: one row per category plus the total, rounded to one
/// decimal place for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForecastTable {
    pub hour_label: String,
    pub rows: Vec<TableRow>,
    pub total_predicted_calls: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PresentationSeries {
    /// Unit or hospital identifier.
    pub subject: String,
    pub hours: Vec<String>,
    pub stacked: Vec<CategorySeries>,
    pub total: Vec<f64>,
    pub distribution: Vec<CategoryShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<ForecastTable>,
}
