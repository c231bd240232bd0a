//! Spending aggregator and month-over-history anomaly detection

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::models::{distinct_months, CategoryMap, CollectedData, Transaction};
use crate::stats::{average, round_currency, round_to, std_dev};

const TOP_CATEGORY_COUNT: usize = 5;
const MAX_ANOMALIES: usize = 3;
/// Months of expense history needed before anything is flagged
const MIN_ANOMALY_MONTHS: usize = 3;
/// z-score above which the latest month is anomalous
const ANOMALY_Z_SCORE: f64 = 2.0;

/// A category's share of a total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub amount: i64,
    /// Percent of the total, 1 decimal
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnomaly {
    pub category: String,
    pub amount: i64,
    /// Standard deviations above the historical mean, 2 decimals
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingMetrics {
    pub monthly_average: i64,
    /// Monthly-normalized amount per category, in first-seen order
    pub by_category: CategoryMap,
    pub top_categories: Vec<CategoryShare>,
    pub anomalies: Vec<SpendingAnomaly>,
}

pub fn calculate_spending(data: &CollectedData, config: &AnalyticsConfig) -> SpendingMetrics {
    let uncategorized = config.uncategorized_label.as_str();

    let mut by_category = CategoryMap::new();
    for expense in data.expenses() {
        by_category.add(expense.category.as_deref().unwrap_or(uncategorized), expense.amount);
    }

    let total_expense = by_category.total();
    let months = distinct_months(data.expenses());
    let per_month = |amount: i64| {
        if months > 0 {
            round_currency(amount as f64 / months as f64)
        } else {
            0
        }
    };

    let mut top_categories: Vec<CategoryShare> = by_category
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount: per_month(amount),
            pct: if total_expense > 0 {
                round_to(amount as f64 / total_expense as f64 * 100.0, 1)
            } else {
                0.0
            },
        })
        .collect();
    // Stable sort keeps first-seen order among equal amounts
    top_categories.sort_by(|a, b| b.amount.cmp(&a.amount));
    top_categories.truncate(TOP_CATEGORY_COUNT);

    SpendingMetrics {
        monthly_average: per_month(total_expense),
        by_category: by_category.map_amounts(per_month),
        top_categories,
        anomalies: detect_anomalies(&data.transactions, uncategorized),
    }
}

/// Flag categories whose latest-month spend sits more than two standard
/// deviations above their mean over the earlier months.
///
/// Needs at least three months of expenses. Categories with no variance in
/// the earlier months, or with no earlier spend at all, are never flagged.
pub fn detect_anomalies(transactions: &[Transaction], uncategorized: &str) -> Vec<SpendingAnomaly> {
    let mut by_month: BTreeMap<String, CategoryMap> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        by_month
            .entry(t.month())
            .or_default()
            .add(t.category.as_deref().unwrap_or(uncategorized), t.amount);
    }

    if by_month.len() < MIN_ANOMALY_MONTHS {
        return Vec::new();
    }

    let Some((_, latest)) = by_month.iter().next_back() else {
        return Vec::new();
    };
    let previous: Vec<&CategoryMap> = by_month.values().take(by_month.len() - 1).collect();

    let known: BTreeSet<&str> = previous
        .iter()
        .flat_map(|m| m.iter().map(|(c, _)| c))
        .collect();

    let mut anomalies: Vec<SpendingAnomaly> = latest
        .iter()
        .filter(|(category, _)| known.contains(category))
        .filter_map(|(category, amount)| {
            let history: Vec<f64> = previous
                .iter()
                .map(|m| m.get(category).unwrap_or(0) as f64)
                .collect();
            let mean = average(&history);
            let sd = std_dev(&history, mean);
            if sd == 0.0 {
                return None;
            }

            let deviation = (amount as f64 - mean) / sd;
            (deviation > ANOMALY_Z_SCORE).then(|| SpendingAnomaly {
                category: category.to_string(),
                amount,
                deviation: round_to(deviation, 2),
            })
        })
        .collect();

    anomalies.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));
    anomalies.truncate(MAX_ANOMALIES);
    anomalies
}
