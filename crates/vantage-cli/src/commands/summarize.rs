//! Summarize command implementation

use std::path::Path;

use anyhow::{Context, Result};
use vantage_core::import::load_transactions_csv;
use vantage_core::{category_totals, monthly_summaries, AnalyticsConfig};

use super::print_json;

pub fn cmd_summarize(csv: &Path, categories: bool, config: &AnalyticsConfig, compact: bool) -> Result<()> {
    let transactions = load_transactions_csv(csv)
        .with_context(|| format!("Failed to read transactions {}", csv.display()))?;

    tracing::info!(
        file = %csv.display(),
        transactions = transactions.len(),
        "Summarizing transactions"
    );

    if categories {
        print_json(&category_totals(&transactions, &config.uncategorized_label), compact)
    } else {
        print_json(&monthly_summaries(&transactions), compact)
    }
}
