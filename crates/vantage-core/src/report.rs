//! Report envelope
//!
//! The narrative stage stores one [`AnalyticsReport`] per group and date.
//! Reading the "latest analytics" joins freshly computed metrics with the
//! newest stored narrative, if there is one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::metrics::{compute_metrics, AnalyticsMetrics};
use crate::models::{CollectedData, ReportingMonth};

/// Narrative text per section; any section may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsInsights {
    pub summary: Option<String>,
    pub savings: Option<String>,
    pub investment: Option<String>,
    pub spending: Option<String>,
    pub balance: Option<String>,
    pub liability: Option<String>,
}

/// A stored narrative report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub group_id: String,
    pub date: NaiveDate,
    pub insights: Option<AnalyticsInsights>,
    /// Model that wrote the narrative
    pub model: Option<String>,
}

/// Current metrics plus the newest stored narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAnalytics {
    pub metrics: AnalyticsMetrics,
    pub insights: Option<AnalyticsInsights>,
    pub date: Option<NaiveDate>,
    pub model: Option<String>,
}

/// Newest stored report for a group
pub fn newest_report<'a>(reports: &'a [AnalyticsReport], group_id: &str) -> Option<&'a AnalyticsReport> {
    reports
        .iter()
        .filter(|r| r.group_id == group_id)
        .max_by_key(|r| r.date)
}

/// Join metrics with a stored report
///
/// `None` when the snapshot has no data at all: there is nothing to report.
/// Metrics are computed without the in-progress `current` month.
pub fn latest_report(
    data: &CollectedData,
    config: &AnalyticsConfig,
    current: &ReportingMonth,
    stored: Option<&AnalyticsReport>,
) -> Option<LatestAnalytics> {
    if !data.has_any_data() {
        tracing::debug!("No data for report");
        return None;
    }

    Some(LatestAnalytics {
        metrics: compute_metrics(&data.without_month(current), config),
        insights: stored.and_then(|r| r.insights.clone()),
        date: stored.map(|r| r.date),
        model: stored.and_then(|r| r.model.clone()),
    })
}
