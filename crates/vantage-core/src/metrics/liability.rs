//! Liability aggregator: totals by category and debt-to-asset ratio

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::models::{CategoryMap, CollectedData};
use crate::stats::round_to;

use super::spending::CategoryShare;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityMetrics {
    pub total_liabilities: i64,
    /// Largest first; ties keep first-seen order
    pub by_category: Vec<CategoryShare>,
    /// Liabilities as a percent of total assets, 1 decimal
    pub debt_to_asset_ratio: f64,
}

pub fn calculate_liability(data: &CollectedData, config: &AnalyticsConfig) -> LiabilityMetrics {
    let mut totals = CategoryMap::new();
    for l in data.liabilities() {
        let category = l
            .liability_category
            .as_deref()
            .unwrap_or(config.other_liability_label.as_str());
        totals.add(category, l.amount);
    }

    let total_liabilities = totals.total();

    let mut by_category: Vec<CategoryShare> = totals
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            pct: if total_liabilities > 0 {
                round_to(amount as f64 / total_liabilities as f64 * 100.0, 1)
            } else {
                0.0
            },
        })
        .collect();
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount));

    let debt_to_asset_ratio = if data.total_assets > 0 {
        round_to(total_liabilities as f64 / data.total_assets as f64 * 100.0, 1)
    } else {
        0.0
    };

    LiabilityMetrics {
        total_liabilities,
        by_category,
        debt_to_asset_ratio,
    }
}
