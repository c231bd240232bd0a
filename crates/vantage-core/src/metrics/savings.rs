//! Savings aggregator: average monthly expense and emergency-fund runway

use serde::{Deserialize, Serialize};

use crate::models::{distinct_months, CollectedData};
use crate::stats::{round_currency, round_to};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsMetrics {
    pub total_assets: i64,
    pub liquid_assets: i64,
    /// Whole currency units
    pub monthly_expense_avg: i64,
    /// Liquid assets over average monthly expense, 1 decimal
    pub emergency_fund_months: f64,
}

pub fn calculate_savings(data: &CollectedData) -> SavingsMetrics {
    let total_expense: i64 = data.expenses().map(|t| t.amount).sum();
    let months = distinct_months(data.expenses());

    let monthly_expense_avg = if months > 0 {
        round_currency(total_expense as f64 / months as f64)
    } else {
        0
    };

    let emergency_fund_months = if monthly_expense_avg > 0 {
        round_to(data.liquid_assets as f64 / monthly_expense_avg as f64, 1)
    } else {
        0.0
    };

    SavingsMetrics {
        total_assets: data.total_assets,
        liquid_assets: data.liquid_assets,
        monthly_expense_avg,
        emergency_fund_months,
    }
}
