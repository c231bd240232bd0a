//! Income stability analyzer: spread, outliers and trend of monthly income

use crate::models::MonthlySummary;
use crate::stats::{average, linear_slope, median, std_dev};

use super::types::{
    IncomeOutlier, IncomeStability, IncomeStabilityResult, IncomeTrend, MeanComparison,
    MonthIncome,
};

/// Standard deviations from the mean beyond which a month is an outlier
const OUTLIER_SIGMA: f64 = 2.0;
/// Slope dead-band as a share of mean income
const TREND_DEAD_BAND: f64 = 0.02;

pub fn analyze_income_stability(summaries: &[MonthlySummary]) -> IncomeStabilityResult {
    let mut sorted = summaries.to_vec();
    sorted.sort_by(|a, b| a.month.cmp(&b.month));

    let (Some(first), Some(latest)) = (sorted.first(), sorted.last()) else {
        return IncomeStabilityResult {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            coefficient_of_variation: 0.0,
            stability: IncomeStability::VeryStable,
            outlier_months: Vec::new(),
            trend: IncomeTrend::Flat,
            trend_slope_per_month: 0.0,
            min_month: None,
            max_month: None,
            latest_vs_mean: None,
        };
    };

    let incomes: Vec<f64> = sorted.iter().map(|m| m.total_income as f64).collect();
    let mean = average(&incomes);
    let sd = std_dev(&incomes, mean);
    let pct_of_mean = |diff: f64| if mean > 0.0 { diff / mean * 100.0 } else { 0.0 };

    let coefficient_of_variation = if mean > 0.0 { sd / mean * 100.0 } else { 0.0 };

    let outlier_months = sorted
        .iter()
        .filter(|m| sd > 0.0 && (m.total_income as f64 - mean).abs() > OUTLIER_SIGMA * sd)
        .map(|m| {
            let deviation = m.total_income as f64 - mean;
            IncomeOutlier {
                month: m.month.clone(),
                income: m.total_income,
                deviation_from_mean: deviation,
                deviation_pct: pct_of_mean(deviation),
            }
        })
        .collect();

    let slope = linear_slope(&incomes);
    let threshold = mean * TREND_DEAD_BAND;
    let trend = if incomes.len() < 3 {
        IncomeTrend::Flat
    } else if slope > threshold {
        IncomeTrend::Increasing
    } else if slope < -threshold {
        IncomeTrend::Decreasing
    } else {
        IncomeTrend::Flat
    };

    let month_income = |m: &MonthlySummary| MonthIncome {
        month: m.month.clone(),
        income: m.total_income,
    };
    let min_month = sorted
        .iter()
        .fold(first, |min, m| if m.total_income < min.total_income { m } else { min });
    let max_month = sorted
        .iter()
        .fold(first, |max, m| if m.total_income > max.total_income { m } else { max });

    let latest_diff = latest.total_income as f64 - mean;

    IncomeStabilityResult {
        mean,
        median: median(&incomes),
        std_dev: sd,
        coefficient_of_variation,
        stability: stability_bucket(coefficient_of_variation),
        outlier_months,
        trend,
        trend_slope_per_month: slope,
        min_month: Some(month_income(min_month)),
        max_month: Some(month_income(max_month)),
        latest_vs_mean: Some(MeanComparison {
            diff: latest_diff,
            diff_pct: pct_of_mean(latest_diff),
        }),
    }
}

/// Bucket a coefficient of variation (percent)
fn stability_bucket(cv: f64) -> IncomeStability {
    if cv < 5.0 {
        IncomeStability::VeryStable
    } else if cv < 15.0 {
        IncomeStability::Stable
    } else if cv < 30.0 {
        IncomeStability::Variable
    } else {
        IncomeStability::HighlyVariable
    }
}
