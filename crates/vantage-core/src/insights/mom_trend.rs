//! Month-over-month trend analyzer
//!
//! Compares each month to the previous one, finds trailing streaks on the
//! income, expense, net-income and savings-rate series, and flags a latest
//! month that looks incomplete.

use crate::config::{DEFAULT_ACCELERATION_RATIO, DEFAULT_PARTIAL_MONTH_RATIO};
use crate::models::MonthlySummary;
use crate::stats::{average, change_rate, linear_slope, savings_rate, streak, StreakDirection};

use super::types::{
    Acceleration, LatestVsAverage, MomTrendResult, MonthComparison, MonthNet, OverallTrend,
    PeriodAverage, TrendStreaks,
};

/// Net-income streak length needed before the trend counts as a direction
const MIN_TREND_STREAK: u32 = 2;
/// Trailing month-over-month diffs used for acceleration
const ACCELERATION_WINDOW: usize = 3;

/// Month-over-month trend analyzer
pub struct MomTrendAnalyzer {
    /// Latest/previous ratio under which the latest month looks partial
    partial_month_ratio: f64,
    /// |slope| / mean |diff| above which the diffs are accelerating
    acceleration_ratio: f64,
}

impl MomTrendAnalyzer {
    pub fn new() -> Self {
        Self {
            partial_month_ratio: DEFAULT_PARTIAL_MONTH_RATIO,
            acceleration_ratio: DEFAULT_ACCELERATION_RATIO,
        }
    }

    pub fn with_thresholds(partial_month_ratio: f64, acceleration_ratio: f64) -> Self {
        Self {
            partial_month_ratio,
            acceleration_ratio,
        }
    }

    pub fn analyze(&self, summaries: &[MonthlySummary]) -> MomTrendResult {
        if summaries.is_empty() {
            return MomTrendResult {
                latest_month_partial: false,
                monthly_comparisons: Vec::new(),
                streaks: TrendStreaks::default(),
                overall_trend: OverallTrend::Stable,
                acceleration: Acceleration::Steady,
                best_month: None,
                worst_month: None,
                three_month_avg: None,
                six_month_avg: None,
                latest_vs_three_month_avg: None,
            };
        }

        let mut sorted = summaries.to_vec();
        sorted.sort_by(|a, b| a.month.cmp(&b.month));

        let comparisons = compare_months(&sorted);

        let series = |f: fn(&MonthlySummary) -> i64| -> Vec<f64> {
            sorted.iter().map(|m| f(m) as f64).collect()
        };
        let savings_rates: Vec<f64> = comparisons.iter().map(|c| c.savings_rate).collect();

        let streaks = TrendStreaks {
            income_streak: streak(&series(|m| m.total_income)),
            expense_streak: streak(&series(|m| m.total_expense)),
            net_income_streak: streak(&series(|m| m.net_income)),
            savings_rate_streak: streak(&savings_rates),
        };

        let overall_trend = if streaks.net_income_streak.months >= MIN_TREND_STREAK {
            match streaks.net_income_streak.direction {
                StreakDirection::Increasing => OverallTrend::Improving,
                _ => OverallTrend::Worsening,
            }
        } else {
            OverallTrend::Stable
        };

        let three_month_avg = trailing_average(&sorted, 3);
        let latest_vs_three_month_avg = three_month_avg.and_then(|avg| {
            sorted.last().map(|latest| LatestVsAverage {
                income_diff: latest.total_income as f64 - avg.income,
                income_diff_pct: pct_of(latest.total_income as f64 - avg.income, avg.income),
                expense_diff: latest.total_expense as f64 - avg.expense,
                expense_diff_pct: pct_of(latest.total_expense as f64 - avg.expense, avg.expense),
                net_income_diff: latest.net_income as f64 - avg.net_income,
            })
        });

        MomTrendResult {
            latest_month_partial: self.latest_month_partial(&sorted),
            acceleration: self.acceleration(&comparisons),
            monthly_comparisons: comparisons,
            streaks,
            overall_trend,
            best_month: extreme_month(&sorted, |candidate, best| candidate > best),
            worst_month: extreme_month(&sorted, |candidate, worst| candidate < worst),
            three_month_avg,
            six_month_avg: trailing_average(&sorted, 6),
            latest_vs_three_month_avg,
        }
    }

    /// Compare the slope of the trailing net-income diffs against their
    /// mean magnitude
    fn acceleration(&self, comparisons: &[MonthComparison]) -> Acceleration {
        if comparisons.len() < 3 {
            return Acceleration::Steady;
        }

        let diffs: Vec<f64> = comparisons
            .iter()
            .filter_map(|c| c.net_income_diff)
            .map(|d| d as f64)
            .collect();
        if diffs.len() < 2 {
            return Acceleration::Steady;
        }

        let recent = &diffs[diffs.len().saturating_sub(ACCELERATION_WINDOW)..];
        let slope = linear_slope(recent);
        let mean_abs = average(&recent.iter().map(|d| d.abs()).collect::<Vec<_>>());

        if mean_abs > 0.0 && slope.abs() / mean_abs > self.acceleration_ratio {
            if slope > 0.0 {
                Acceleration::Accelerating
            } else {
                Acceleration::Decelerating
            }
        } else {
            Acceleration::Steady
        }
    }

    /// A latest month with income or expense far below the month before
    /// usually means its data is still coming in
    fn latest_month_partial(&self, sorted: &[MonthlySummary]) -> bool {
        let [.., prev, latest] = sorted else {
            return false;
        };

        let ratio = |current: i64, previous: i64| {
            if previous > 0 {
                current as f64 / previous as f64
            } else {
                1.0
            }
        };

        ratio(latest.total_income, prev.total_income) < self.partial_month_ratio
            || ratio(latest.total_expense, prev.total_expense) < self.partial_month_ratio
    }
}

impl Default for MomTrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze with the default thresholds
pub fn analyze_mom_trend(summaries: &[MonthlySummary]) -> MomTrendResult {
    MomTrendAnalyzer::new().analyze(summaries)
}

fn compare_months(sorted: &[MonthlySummary]) -> Vec<MonthComparison> {
    sorted
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let prev = i.checked_sub(1).map(|p| &sorted[p]);
            let rate = |current: i64, previous: i64| change_rate(current as f64, previous as f64);

            MonthComparison {
                month: m.month.clone(),
                total_income: m.total_income,
                total_expense: m.total_expense,
                net_income: m.net_income,
                savings_rate: savings_rate(m.total_income as f64, m.total_expense as f64),
                income_diff: prev.map(|p| m.total_income - p.total_income),
                expense_diff: prev.map(|p| m.total_expense - p.total_expense),
                net_income_diff: prev.map(|p| m.net_income - p.net_income),
                income_change_rate: prev.and_then(|p| rate(m.total_income, p.total_income)),
                expense_change_rate: prev.and_then(|p| rate(m.total_expense, p.total_expense)),
                net_income_change_rate: prev.and_then(|p| rate(m.net_income, p.net_income)),
            }
        })
        .collect()
}

/// First month whose net income beats every earlier one under `better`
fn extreme_month(sorted: &[MonthlySummary], better: fn(i64, i64) -> bool) -> Option<MonthNet> {
    sorted
        .iter()
        .reduce(|best, m| if better(m.net_income, best.net_income) { m } else { best })
        .map(|m| MonthNet {
            month: m.month.clone(),
            net_income: m.net_income,
        })
}

/// Average of the last `window` months, only when that many exist
fn trailing_average(sorted: &[MonthlySummary], window: usize) -> Option<PeriodAverage> {
    if sorted.len() < window {
        return None;
    }
    let items = &sorted[sorted.len() - window..];
    let avg = |f: fn(&MonthlySummary) -> f64| average(&items.iter().map(f).collect::<Vec<_>>());

    Some(PeriodAverage {
        income: avg(|m| m.total_income as f64),
        expense: avg(|m| m.total_expense as f64),
        net_income: avg(|m| m.net_income as f64),
        savings_rate: avg(|m| savings_rate(m.total_income as f64, m.total_expense as f64)),
    })
}

/// `diff` as a percent of `base`; 0 when the base is not positive
fn pct_of(diff: f64, base: f64) -> f64 {
    if base > 0.0 {
        diff / base * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(month: &str, income: i64, expense: i64) -> MonthlySummary {
        MonthlySummary::new(month, income, expense)
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let result = analyze_mom_trend(&[]);
        assert!(!result.latest_month_partial);
        assert!(result.monthly_comparisons.is_empty());
        assert_eq!(result.overall_trend, OverallTrend::Stable);
        assert_eq!(result.acceleration, Acceleration::Steady);
        assert!(result.best_month.is_none());
        assert!(result.three_month_avg.is_none());
    }

    #[test]
    fn test_comparisons_sorted_with_null_first_diffs() {
        let result = analyze_mom_trend(&[
            month("2026-02", 1200, 800),
            month("2026-01", 1000, 800),
        ]);

        let first = &result.monthly_comparisons[0];
        assert_eq!(first.month, "2026-01");
        assert_eq!(first.income_diff, None);
        assert_eq!(first.income_change_rate, None);
        assert!((first.savings_rate - 20.0).abs() < 1e-9);

        let second = &result.monthly_comparisons[1];
        assert_eq!(second.income_diff, Some(200));
        assert!((second.income_change_rate.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(second.expense_change_rate, Some(0.0));
    }

    #[test]
    fn test_change_rate_unavailable_from_zero() {
        let result = analyze_mom_trend(&[month("2026-01", 0, 500), month("2026-02", 1000, 500)]);
        assert_eq!(result.monthly_comparisons[1].income_change_rate, None);
        assert_eq!(result.monthly_comparisons[1].income_diff, Some(1000));
    }

    #[test]
    fn test_overall_trend_needs_two_month_streak() {
        // Net 100 -> 200 is a streak of one
        let one = analyze_mom_trend(&[month("2026-01", 500, 400), month("2026-02", 600, 400)]);
        assert_eq!(one.streaks.net_income_streak.months, 1);
        assert_eq!(one.overall_trend, OverallTrend::Stable);

        let improving = analyze_mom_trend(&[
            month("2026-01", 500, 400),
            month("2026-02", 600, 400),
            month("2026-03", 700, 400),
        ]);
        assert_eq!(improving.overall_trend, OverallTrend::Improving);

        let worsening = analyze_mom_trend(&[
            month("2026-01", 700, 400),
            month("2026-02", 600, 400),
            month("2026-03", 500, 400),
        ]);
        assert_eq!(worsening.overall_trend, OverallTrend::Worsening);
    }

    #[test]
    fn test_acceleration() {
        // Net diffs 100, 200, 400: slope 150 against mean |diff| 233
        let accelerating = analyze_mom_trend(&[
            month("2026-01", 1000, 1000),
            month("2026-02", 1100, 1000),
            month("2026-03", 1300, 1000),
            month("2026-04", 1700, 1000),
        ]);
        assert_eq!(accelerating.acceleration, Acceleration::Accelerating);

        // Constant diffs have zero slope
        let steady = analyze_mom_trend(&[
            month("2026-01", 1000, 1000),
            month("2026-02", 1100, 1000),
            month("2026-03", 1200, 1000),
            month("2026-04", 1300, 1000),
        ]);
        assert_eq!(steady.acceleration, Acceleration::Steady);
    }

    #[test]
    fn test_acceleration_requires_three_diffs_for_slope() {
        // Two diffs give a slope of 0, so always steady
        let result = analyze_mom_trend(&[
            month("2026-01", 1000, 1000),
            month("2026-02", 1100, 1000),
            month("2026-03", 2000, 1000),
        ]);
        assert_eq!(result.acceleration, Acceleration::Steady);
    }

    #[test]
    fn test_best_and_worst_months_keep_first_on_tie() {
        let result = analyze_mom_trend(&[
            month("2026-01", 1000, 500),
            month("2026-02", 1000, 900),
            month("2026-03", 1000, 500),
        ]);
        assert_eq!(result.best_month.unwrap().month, "2026-01");
        assert_eq!(result.worst_month.unwrap().net_income, 100);
    }

    #[test]
    fn test_rolling_averages_need_full_window() {
        let months: Vec<_> = (1..=5)
            .map(|m| month(&format!("2026-{:02}", m), 1000 * m, 500))
            .collect();

        let result = analyze_mom_trend(&months);
        let avg = result.three_month_avg.unwrap();
        assert_eq!(avg.income, 4000.0);
        assert!(result.six_month_avg.is_none());

        let latest = result.latest_vs_three_month_avg.unwrap();
        assert_eq!(latest.income_diff, 1000.0);
        assert_eq!(latest.income_diff_pct, 25.0);
        assert_eq!(latest.expense_diff_pct, 0.0);
    }

    #[test]
    fn test_latest_month_partial() {
        let partial = analyze_mom_trend(&[month("2026-01", 1000, 1000), month("2026-02", 1000, 200)]);
        assert!(partial.latest_month_partial);

        let complete = analyze_mom_trend(&[month("2026-01", 1000, 1000), month("2026-02", 900, 800)]);
        assert!(!complete.latest_month_partial);

        // No previous income means the income ratio is neutral
        let no_prev = analyze_mom_trend(&[month("2026-01", 0, 1000), month("2026-02", 10, 900)]);
        assert!(!no_prev.latest_month_partial);
    }

    #[test]
    fn test_custom_thresholds() {
        let analyzer = MomTrendAnalyzer::with_thresholds(0.9, 0.2);
        let result = analyzer.analyze(&[month("2026-01", 1000, 1000), month("2026-02", 850, 1000)]);
        assert!(result.latest_month_partial);
    }
}
