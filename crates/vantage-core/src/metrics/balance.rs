//! Balance aggregator: monthly income/expense trend and savings rate

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CollectedData, TransactionType};
use crate::stats::{round_currency, round_to, savings_rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub month: String,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceMetrics {
    pub monthly_income: i64,
    pub monthly_expense: i64,
    /// Percent, 1 decimal, from the rounded monthly figures
    pub savings_rate: f64,
    /// Chronological
    pub trend: Vec<BalancePoint>,
}

pub fn calculate_balance(data: &CollectedData) -> BalanceMetrics {
    let mut by_month: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for t in &data.transactions {
        let entry = by_month.entry(t.month()).or_insert((0, 0));
        match t.kind {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }

    let trend: Vec<BalancePoint> = by_month
        .into_iter()
        .map(|(month, (income, expense))| BalancePoint {
            month,
            income,
            expense,
            balance: income - expense,
        })
        .collect();

    let total_income: i64 = trend.iter().map(|p| p.income).sum();
    let total_expense: i64 = trend.iter().map(|p| p.expense).sum();
    let months = trend.len().max(1) as f64;

    let monthly_income = round_currency(total_income as f64 / months);
    let monthly_expense = round_currency(total_expense as f64 / months);
    let savings_rate = if monthly_income > 0 {
        round_to(savings_rate(monthly_income as f64, monthly_expense as f64), 1)
    } else {
        0.0
    };

    BalanceMetrics {
        monthly_income,
        monthly_expense,
        savings_rate,
        trend,
    }
}
