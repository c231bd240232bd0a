//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use vantage_core::{AnalyticsConfig, AnalyzerKind, ReportingMonth};

use crate::cli::{Cli, Commands, InputArgs};
use crate::commands;

const SNAPSHOT: &str = r#"{
    "totalAssets": 3000000,
    "liquidAssets": 900000,
    "holdings": [
        {"name": "Index Fund", "categoryName": "Investment trusts", "amount": 1500000,
         "unrealizedGain": 200000, "unrealizedGainPct": 15.4, "dailyChange": 8000},
        {"name": "Savings", "categoryName": "Cash", "amount": 900000},
        {"name": "Card", "amount": 120000, "isLiability": true}
    ],
    "transactions": [
        {"date": "2026-07-25", "category": "Salary", "amount": 300000, "type": "income"},
        {"date": "2026-07-10", "category": "Rent", "amount": 100000, "type": "expense"},
        {"date": "2026-08-25", "category": "Salary", "amount": 300000, "type": "income"},
        {"date": "2026-08-10", "category": "Rent", "amount": 100000, "type": "expense"}
    ]
}"#;

const TRANSACTIONS: &str = "date,category,amount,type\n\
                            2026-09-25,Salary,310000,income\n\
                            2026-09-10,Rent,100000,expense\n\
                            2026-09-14,Dining,15000,expense\n";

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn input(snapshot: &NamedTempFile, csv: Option<&NamedTempFile>) -> InputArgs {
    InputArgs {
        input: snapshot.path().to_path_buf(),
        transactions: csv.map(|f| f.path().to_path_buf()),
    }
}

fn october() -> ReportingMonth {
    ReportingMonth::parse("2026-10").unwrap()
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_analyze_args() {
    let cli = Cli::try_parse_from([
        "vantage",
        "analyze",
        "--input",
        "snap.json",
        "--only",
        "mom_trend,portfolio_risk",
        "--month",
        "2026-10",
        "--verbose",
    ])
    .unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Analyze {
            source,
            only,
            month,
        } => {
            assert_eq!(source.input, PathBuf::from("snap.json"));
            assert_eq!(only, vec!["mom_trend", "portfolio_risk"]);
            assert_eq!(month.as_deref(), Some("2026-10"));
        }
        _ => panic!("expected analyze"),
    }
}

#[test]
fn test_global_config_flag() {
    let cli = Cli::try_parse_from(["vantage", "tools", "--config", "custom.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
}

#[test]
fn test_metrics_requires_input() {
    assert!(Cli::try_parse_from(["vantage", "metrics"]).is_err());
}

// ========== Input Loading Tests ==========

#[test]
fn test_load_input_appends_csv() {
    let snapshot = temp_file(SNAPSHOT);
    let csv = temp_file(TRANSACTIONS);

    let data = commands::load_input(&input(&snapshot, Some(&csv))).unwrap();
    assert_eq!(data.transactions.len(), 7);
    assert_eq!(data.total_assets, 3_000_000);
}

#[test]
fn test_load_input_missing_file() {
    let args = InputArgs {
        input: PathBuf::from("/nonexistent/snapshot.json"),
        transactions: None,
    };
    let err = commands::load_input(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to read snapshot"));
}

#[test]
fn test_load_config_override() {
    let file = temp_file("[categories]\nuncategorized = \"Misc\"\n");
    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.uncategorized_label, "Misc");
}

#[test]
fn test_reporting_month() {
    assert_eq!(
        commands::reporting_month(Some("2026-03")).unwrap().as_str(),
        "2026-03"
    );
    assert!(commands::reporting_month(Some("March")).is_err());
    assert_eq!(commands::reporting_month(None).unwrap().as_str().len(), 7);
}

// ========== Analysis Command Tests ==========

#[test]
fn test_parse_kinds() {
    assert_eq!(commands::parse_kinds(&[]).unwrap().len(), 5);
    assert_eq!(
        commands::parse_kinds(&["income-stability".to_string()]).unwrap(),
        vec![AnalyzerKind::IncomeStability]
    );
    assert!(commands::parse_kinds(&["bogus".to_string()]).is_err());
}

#[test]
fn test_run_analysis_subset() {
    let snapshot = temp_file(SNAPSHOT);
    let csv = temp_file(TRANSACTIONS);
    let data = commands::load_input(&input(&snapshot, Some(&csv))).unwrap();
    let config = AnalyticsConfig::default();

    let bundle = commands::run_analysis(
        &data,
        &config,
        &[AnalyzerKind::MomTrend, AnalyzerKind::PortfolioRisk],
        &october(),
    );

    let mom = bundle.mom_trend.unwrap();
    assert_eq!(mom.monthly_comparisons.len(), 3);
    assert_eq!(bundle.portfolio_risk.unwrap().holdings_count, 1);
    assert!(bundle.income_stability.is_none());
    assert!(bundle.spending_comparison.is_none());
}

#[test]
fn test_cmd_metrics_and_analyze() {
    let snapshot = temp_file(SNAPSHOT);
    let data = commands::load_input(&input(&snapshot, None)).unwrap();
    let config = AnalyticsConfig::default();

    assert!(commands::cmd_metrics(&data, &config, &october(), true).is_ok());
    assert!(commands::cmd_analyze(&data, &config, &[], &october(), true).is_ok());
    assert!(commands::cmd_analyze(&data, &config, &["nope".to_string()], &october(), true).is_err());
}

#[test]
fn test_metrics_exclude_current_month() {
    let snapshot = temp_file(SNAPSHOT);
    let csv = temp_file(TRANSACTIONS);
    let data = commands::load_input(&input(&snapshot, Some(&csv))).unwrap();
    let config = AnalyticsConfig::default();

    // With September in progress only July and August count
    let september = ReportingMonth::parse("2026-09").unwrap();
    let metrics = commands::metrics_for(&data, &config, &september);
    assert_eq!(metrics.savings.monthly_expense_avg, 100_000);
    assert_eq!(metrics.balance.trend.len(), 2);

    let tool = commands::call_tool(&data, &config, "get_financial_metrics", None, &september).unwrap();
    assert_eq!(tool["savings"]["monthlyExpenseAvg"], 100_000);

    let metrics = commands::metrics_for(&data, &config, &october());
    assert_eq!(metrics.savings.monthly_expense_avg, 105_000);
}

#[test]
fn test_parse_metrics_month() {
    let cli = Cli::try_parse_from(["vantage", "metrics", "-i", "s.json", "--month", "2026-09"]).unwrap();
    match cli.command {
        Commands::Metrics { month, .. } => assert_eq!(month.as_deref(), Some("2026-09")),
        _ => panic!("expected metrics"),
    }
}

#[test]
fn test_call_tool() {
    let snapshot = temp_file(SNAPSHOT);
    let data = commands::load_input(&input(&snapshot, None)).unwrap();
    let config = AnalyticsConfig::default();

    let result =
        commands::call_tool(&data, &config, "mom_trend", Some(r#"{"months": 1}"#), &october()).unwrap();
    assert_eq!(result["monthlyComparisons"].as_array().unwrap().len(), 1);

    let metrics =
        commands::call_tool(&data, &config, "get_financial_metrics", None, &october()).unwrap();
    assert!(metrics["healthScore"]["totalScore"].is_u64());

    assert!(commands::call_tool(&data, &config, "unknown", None, &october()).is_err());
    assert!(commands::call_tool(&data, &config, "mom_trend", Some("{"), &october()).is_err());
}

#[test]
fn test_cmd_tools() {
    assert!(commands::cmd_tools(false).is_ok());
}

// ========== Report Command Tests ==========

#[test]
fn test_load_reports() {
    let file = temp_file(
        r#"[
            {"groupId": "g1", "date": "2026-09-01", "insights": {"summary": "Old"}, "model": null},
            {"groupId": "g1", "date": "2026-10-01", "insights": {"summary": "New"}, "model": "m"}
        ]"#,
    );
    let reports = commands::load_reports(file.path()).unwrap();
    assert_eq!(reports.len(), 2);

    let newest = vantage_core::report::newest_report(&reports, "g1").unwrap();
    assert_eq!(newest.model.as_deref(), Some("m"));
}

#[test]
fn test_cmd_report() {
    let snapshot = temp_file(SNAPSHOT);
    let data = commands::load_input(&input(&snapshot, None)).unwrap();
    let config = AnalyticsConfig::default();
    let reports = temp_file("[]");

    assert!(commands::cmd_report(&data, &config, None, "default", &october(), true).is_ok());
    assert!(commands::cmd_report(&data, &config, Some(reports.path()), "g1", &october(), true).is_ok());

    let bad = temp_file("not json");
    assert!(commands::cmd_report(&data, &config, Some(bad.path()), "g1", &october(), true).is_err());
}

// ========== Summarize Command Tests ==========

#[test]
fn test_cmd_summarize() {
    let csv = temp_file(TRANSACTIONS);
    let config = AnalyticsConfig::default();
    assert!(commands::cmd_summarize(csv.path(), false, &config, true).is_ok());
    assert!(commands::cmd_summarize(csv.path(), true, &config, true).is_ok());
}

#[test]
fn test_to_json_compact() {
    let json = commands::to_json(&serde_json::json!({"a": 1}), true).unwrap();
    assert_eq!(json, r#"{"a":1}"#);
    let pretty = commands::to_json(&serde_json::json!({"a": 1}), false).unwrap();
    assert!(pretty.contains('\n'));
}
