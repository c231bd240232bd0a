//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analysis` - Metrics, analyzers, tool calls and the report envelope
//! - `summarize` - Monthly and per-category summaries of a transactions CSV
//!
//! Shared helpers for loading config and input live here.

pub mod analysis;
pub mod summarize;

pub use analysis::*;
pub use summarize::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use vantage_core::import::{load_snapshot, load_transactions_csv};
use vantage_core::{AnalyticsConfig, CollectedData, ReportingMonth};

use crate::cli::InputArgs;

/// Load the analytics config from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let config = match path {
        Some(path) => AnalyticsConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalyticsConfig::load().context("Failed to load analytics config")?,
    };
    Ok(config)
}

/// Read the snapshot, then append transactions from the CSV if one was given
pub fn load_input(source: &InputArgs) -> Result<CollectedData> {
    let mut data = load_snapshot(&source.input)
        .with_context(|| format!("Failed to read snapshot {}", source.input.display()))?;

    if let Some(csv) = &source.transactions {
        let transactions = load_transactions_csv(csv)
            .with_context(|| format!("Failed to read transactions {}", csv.display()))?;
        tracing::debug!(count = transactions.len(), "Appending CSV transactions");
        data.transactions.extend(transactions);
    }

    Ok(data)
}

/// The explicit month, or the month of today's local date
pub fn reporting_month(month: Option<&str>) -> Result<ReportingMonth> {
    match month {
        Some(m) => Ok(ReportingMonth::parse(m)?),
        None => Ok(ReportingMonth::from_date(Local::now().date_naive())),
    }
}

pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    println!("{}", to_json(value, compact)?);
    Ok(())
}
