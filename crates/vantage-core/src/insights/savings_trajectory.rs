//! Savings trajectory analyzer
//!
//! Tracks the savings-rate history and estimates how the emergency fund
//! moved since the previous month, what drove it, and how long until it
//! covers six months of expenses.

use crate::metrics::SavingsMetrics;
use crate::models::MonthlySummary;
use crate::stats::{average, linear_slope, savings_rate};

use super::types::{PrimaryFactor, SavingsRatePoint, SavingsTrajectoryResult, TrajectoryDirection};

/// Savings-rate slope (points per month) that counts as a trend
const RATE_TREND_THRESHOLD: f64 = 1.0;
/// Emergency-fund change (months) that counts as a direction
const FUND_DIRECTION_THRESHOLD: f64 = 0.5;
/// Relative expense move that counts as the primary factor
const EXPENSE_CHANGE_THRESHOLD: f64 = 0.05;
const TARGET_FUND_MONTHS: f64 = 6.0;

/// Current savings position the trajectory starts from
pub type SavingsInput = SavingsMetrics;

pub fn analyze_savings_trajectory(
    current: &SavingsInput,
    summaries: &[MonthlySummary],
) -> SavingsTrajectoryResult {
    let current_fund_months = current.emergency_fund_months;

    let mut sorted = summaries.to_vec();
    sorted.sort_by(|a, b| a.month.cmp(&b.month));

    let savings_rate_history: Vec<SavingsRatePoint> = sorted
        .iter()
        .map(|m| SavingsRatePoint {
            month: m.month.clone(),
            savings_rate: savings_rate(m.total_income as f64, m.total_expense as f64),
        })
        .collect();
    let rates: Vec<f64> = savings_rate_history.iter().map(|p| p.savings_rate).collect();
    let average_savings_rate = average(&rates);

    let savings_rate_trend = if rates.len() >= 3 {
        direction_of(linear_slope(&rates), RATE_TREND_THRESHOLD)
    } else {
        TrajectoryDirection::Stable
    };

    let cumulative_net_income = sorted.iter().map(|m| m.net_income).sum();

    let liquid_assets_to_total_ratio = if current.total_assets > 0 {
        current.liquid_assets as f64 / current.total_assets as f64 * 100.0
    } else {
        0.0
    };

    // Second-to-last month is the comparison point
    let previous_expense = sorted
        .len()
        .checked_sub(2)
        .map(|i| sorted[i].total_expense);

    let previous_emergency_fund_months = previous_expense
        .filter(|&expense| expense > 0)
        .map(|expense| current.liquid_assets as f64 / expense as f64);
    let emergency_fund_change = previous_emergency_fund_months.map(|prev| current_fund_months - prev);

    let direction = emergency_fund_change
        .map(|change| direction_of(change, FUND_DIRECTION_THRESHOLD))
        .unwrap_or(TrajectoryDirection::Stable);

    let primary_factor = match previous_expense {
        Some(prev) => primary_factor(current.monthly_expense_avg, prev, direction),
        None => PrimaryFactor::Mixed,
    };

    let months_to_six_month_target = if current_fund_months < TARGET_FUND_MONTHS
        && average_savings_rate > 0.0
        && !sorted.is_empty()
    {
        let avg_income = average(&sorted.iter().map(|m| m.total_income as f64).collect::<Vec<_>>());
        let monthly_saving = avg_income * (average_savings_rate / 100.0);
        let gap = current.monthly_expense_avg as f64 * TARGET_FUND_MONTHS - current.liquid_assets as f64;
        (monthly_saving > 0.0 && gap > 0.0).then(|| (gap / monthly_saving).ceil() as u32)
    } else {
        None
    };

    SavingsTrajectoryResult {
        current_emergency_fund_months: current_fund_months,
        previous_emergency_fund_months,
        emergency_fund_change,
        direction,
        primary_factor,
        months_to_six_month_target,
        savings_rate_history,
        average_savings_rate,
        savings_rate_trend,
        cumulative_net_income,
        liquid_assets_to_total_ratio,
    }
}

fn direction_of(value: f64, threshold: f64) -> TrajectoryDirection {
    if value > threshold {
        TrajectoryDirection::Improving
    } else if value < -threshold {
        TrajectoryDirection::Declining
    } else {
        TrajectoryDirection::Stable
    }
}

/// Attribute the fund change to spending first, then to assets
fn primary_factor(
    monthly_expense_avg: i64,
    previous_expense: i64,
    direction: TrajectoryDirection,
) -> PrimaryFactor {
    let expense_changed = previous_expense > 0
        && ((monthly_expense_avg - previous_expense).abs() as f64 / previous_expense as f64)
            > EXPENSE_CHANGE_THRESHOLD;

    if expense_changed && monthly_expense_avg > previous_expense {
        PrimaryFactor::ExpenseIncrease
    } else if expense_changed && monthly_expense_avg < previous_expense {
        PrimaryFactor::ExpenseDecrease
    } else {
        match direction {
            TrajectoryDirection::Improving => PrimaryFactor::AssetIncrease,
            TrajectoryDirection::Declining => PrimaryFactor::AssetDecrease,
            TrajectoryDirection::Stable => PrimaryFactor::Mixed,
        }
    }
}
