//! Vantage Core Library
//!
//! Analytics engine for the Vantage personal finance tool:
//! - Statistical primitives (mean, median, slope, streaks)
//! - Snapshot metrics for savings, investment, spending, growth, balance
//!   and liabilities, scored into a 0-100 health score
//! - Trend and risk analyzers over monthly history
//! - Tool definitions for the narrative stage
//! - Snapshot and transaction CSV import
//!
//! The engine is pure: the same snapshot and reporting month always give
//! the same output, and nothing reads the clock or touches storage.

pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod report;
pub mod stats;
pub mod tools;

pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use insights::{AnalysisBundle, AnalysisContext, AnalyzerKind, InsightEngine};
pub use metrics::{compute_metrics, AnalyticsMetrics, HealthScore};
pub use models::{
    category_totals, exclude_month, monthly_summaries, CategoryTotal, CollectedData, Holding,
    MonthlySummary, ReportingMonth, Snapshot, Transaction, TransactionType,
};
pub use report::{latest_report, AnalyticsInsights, AnalyticsReport, LatestAnalytics};
pub use tools::{analysis_tools, AnalysisToolbox, Tool};
