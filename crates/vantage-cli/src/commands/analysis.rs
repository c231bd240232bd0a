//! Analysis command implementations (metrics, analyze, call, tools, report)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vantage_core::report::newest_report;
use vantage_core::{
    analysis_tools, compute_metrics, latest_report, AnalysisBundle, AnalysisContext,
    AnalysisToolbox, AnalyticsConfig, AnalyticsMetrics, AnalyticsReport, AnalyzerKind, CollectedData,
    InsightEngine, ReportingMonth,
};

use super::print_json;

/// Parse `--only` values; an empty list means every analyzer
pub fn parse_kinds(only: &[String]) -> Result<Vec<AnalyzerKind>> {
    if only.is_empty() {
        return Ok(AnalyzerKind::ALL.to_vec());
    }
    only.iter()
        .map(|s| s.parse::<AnalyzerKind>().map_err(anyhow::Error::msg))
        .collect()
}

pub fn run_analysis(
    data: &CollectedData,
    config: &AnalyticsConfig,
    kinds: &[AnalyzerKind],
    month: &ReportingMonth,
) -> AnalysisBundle {
    let ctx = AnalysisContext::from_data(data, config, month);
    tracing::info!(
        current_month = %month,
        months = ctx.monthly_summaries.len(),
        analyzers = kinds.len(),
        "Running analyzers"
    );
    InsightEngine::from_config(config).analyze(&ctx, kinds)
}

/// Metrics over the complete months only
pub fn metrics_for(
    data: &CollectedData,
    config: &AnalyticsConfig,
    month: &ReportingMonth,
) -> AnalyticsMetrics {
    compute_metrics(&data.without_month(month), config)
}

pub fn cmd_metrics(
    data: &CollectedData,
    config: &AnalyticsConfig,
    month: &ReportingMonth,
    compact: bool,
) -> Result<()> {
    let metrics = metrics_for(data, config, month);
    tracing::info!(
        current_month = %month,
        health_score = metrics.health_score.total_score,
        "Computed metrics"
    );
    print_json(&metrics, compact)
}

pub fn cmd_analyze(
    data: &CollectedData,
    config: &AnalyticsConfig,
    only: &[String],
    month: &ReportingMonth,
    compact: bool,
) -> Result<()> {
    let kinds = parse_kinds(only)?;
    let bundle = run_analysis(data, config, &kinds, month);
    if bundle.is_empty() {
        tracing::warn!("No analyzer produced a result");
    }
    print_json(&bundle, compact)
}

pub fn cmd_tools(compact: bool) -> Result<()> {
    print_json(&analysis_tools(), compact)
}

pub fn call_tool(
    data: &CollectedData,
    config: &AnalyticsConfig,
    name: &str,
    params: Option<&str>,
    month: &ReportingMonth,
) -> Result<serde_json::Value> {
    let input = match params {
        Some(p) => serde_json::from_str(p).context("Invalid --params JSON")?,
        None => serde_json::Value::Null,
    };

    let toolbox = AnalysisToolbox::new(data, config, month);
    toolbox
        .call(name, &input)
        .with_context(|| format!("Tool {} failed", name))
}

pub fn cmd_call(
    data: &CollectedData,
    config: &AnalyticsConfig,
    name: &str,
    params: Option<&str>,
    month: &ReportingMonth,
    compact: bool,
) -> Result<()> {
    let result = call_tool(data, config, name, params, month)?;
    print_json(&result, compact)
}

pub fn load_reports(path: &Path) -> Result<Vec<AnalyticsReport>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reports {}", path.display()))?;
    let reports = serde_json::from_str(&content)
        .with_context(|| format!("Invalid reports JSON in {}", path.display()))?;
    Ok(reports)
}

pub fn cmd_report(
    data: &CollectedData,
    config: &AnalyticsConfig,
    reports: Option<&Path>,
    group: &str,
    month: &ReportingMonth,
    compact: bool,
) -> Result<()> {
    let stored = match reports {
        Some(path) => load_reports(path)?,
        None => Vec::new(),
    };
    let newest = newest_report(&stored, group);
    if reports.is_some() && newest.is_none() {
        tracing::warn!(group, "No stored report for group");
    }

    match latest_report(data, config, month, newest) {
        Some(latest) => print_json(&latest, compact),
        None => {
            tracing::warn!("Snapshot has no data to report on");
            print_json(&serde_json::Value::Null, compact)
        }
    }
}
