//! Spending comparison analyzer
//!
//! Compares each expense category's latest month with its trailing 3- and
//! 6-month averages, grades how unusual it is, and ranks the biggest moves.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CategoryTotal, TransactionType};
use crate::stats::{average, linear_slope, std_dev};

use super::types::{
    CategoryComparison, CategoryMove, CategoryTrend, Severity, SpendingComparisonResult,
};

const SHORT_WINDOW: usize = 3;
const LONG_WINDOW: usize = 6;
const TOP_MOVES: usize = 3;
/// Slope dead-band as a share of the category mean
const TREND_DEAD_BAND: f64 = 0.03;

/// Compare category spending in `latest_month` (`YYYY-MM`) with earlier months
pub fn analyze_spending_comparison(
    totals: &[CategoryTotal],
    latest_month: &str,
) -> SpendingComparisonResult {
    let expenses: Vec<&CategoryTotal> = totals
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
        .collect();
    if expenses.is_empty() {
        return SpendingComparisonResult::default();
    }

    // First-seen category order, month -> amount per category
    let mut by_category: Vec<(&str, BTreeMap<&str, i64>)> = Vec::new();
    for e in &expenses {
        let index = match by_category.iter().position(|(c, _)| *c == e.category) {
            Some(index) => index,
            None => {
                by_category.push((e.category.as_str(), BTreeMap::new()));
                by_category.len() - 1
            }
        };
        by_category[index].1.insert(e.month.as_str(), e.total_amount);
    }

    let all_months: Vec<&str> = expenses
        .iter()
        .map(|e| e.month.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let previous_months: Vec<&str> = all_months
        .iter()
        .copied()
        .filter(|m| *m < latest_month)
        .collect();
    let previous_month = previous_months.last().copied();

    let month_total = |month: &str| -> i64 {
        expenses
            .iter()
            .filter(|e| e.month == month)
            .map(|e| e.total_amount)
            .sum()
    };
    let total_current_expense = month_total(latest_month);
    let total_previous_month_expense = previous_month.map(month_total);
    let total_change_rate = total_previous_month_expense
        .filter(|&prev| prev > 0)
        .map(|prev| (total_current_expense - prev) as f64 / prev as f64 * 100.0);

    let mut new_categories = Vec::new();
    let mut categories = Vec::with_capacity(by_category.len());

    for (category, months) in &by_category {
        let amount_in = |month: &str| months.get(month).copied().unwrap_or(0) as f64;
        let current_amount = months.get(latest_month).copied().unwrap_or(0);
        let current = current_amount as f64;

        if previous_months.is_empty() && current_amount > 0 {
            new_categories.push(category.to_string());
        }

        let window = |size: usize| -> Vec<f64> {
            previous_months[previous_months.len().saturating_sub(size)..]
                .iter()
                .map(|m| amount_in(m))
                .collect()
        };
        let short = window(SHORT_WINDOW);
        let long = window(LONG_WINDOW);

        let three_month_avg = (short.len() >= SHORT_WINDOW).then(|| average(&short));
        let six_month_avg = (long.len() >= LONG_WINDOW).then(|| average(&long));

        let all_values: Vec<f64> = all_months.iter().map(|m| amount_in(m)).collect();

        let previous_proportion_of_total = match (previous_month, total_previous_month_expense) {
            (Some(month), Some(total)) if total > 0 => Some(amount_in(month) / total as f64 * 100.0),
            _ => None,
        };

        categories.push(CategoryComparison {
            category: category.to_string(),
            current_amount,
            three_month_avg,
            six_month_avg,
            deviation_from_three_month: three_month_avg.map(|avg| current - avg),
            deviation_from_three_month_pct: deviation_pct(current, three_month_avg),
            deviation_from_six_month: six_month_avg.map(|avg| current - avg),
            deviation_from_six_month_pct: deviation_pct(current, six_month_avg),
            severity: severity(current, &short),
            trend_direction: category_trend(&all_values),
            proportion_of_total: if total_current_expense > 0 {
                current / total_current_expense as f64 * 100.0
            } else {
                0.0
            },
            previous_proportion_of_total,
        });
    }

    let abs_deviation = |c: &CategoryComparison| c.deviation_from_three_month.unwrap_or(0.0).abs();
    categories.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| abs_deviation(b).total_cmp(&abs_deviation(a)))
    });

    let moves = |keep: fn(f64) -> bool, descending: bool| -> Vec<CategoryMove> {
        let mut moved: Vec<(&CategoryComparison, f64)> = categories
            .iter()
            .filter_map(|c| c.deviation_from_three_month.map(|d| (c, d)))
            .filter(|(_, d)| keep(*d))
            .collect();
        moved.sort_by(|a, b| {
            if descending {
                b.1.total_cmp(&a.1)
            } else {
                a.1.total_cmp(&b.1)
            }
        });
        moved
            .into_iter()
            .take(TOP_MOVES)
            .map(|(c, diff)| CategoryMove {
                category: c.category.clone(),
                diff,
                diff_pct: c.deviation_from_three_month_pct,
            })
            .collect()
    };
    let top_increasing = moves(|d| d > 0.0, true);
    let top_decreasing = moves(|d| d < 0.0, false);

    let count = |severity: Severity| categories.iter().filter(|c| c.severity == severity).count();

    SpendingComparisonResult {
        anomalous_count: count(Severity::Anomalous),
        elevated_count: count(Severity::Elevated),
        categories,
        new_categories,
        total_current_expense,
        total_previous_month_expense,
        total_change_rate,
        top_increasing,
        top_decreasing,
    }
}

fn deviation_pct(current: f64, avg: Option<f64>) -> Option<f64> {
    avg.filter(|&a| a != 0.0).map(|a| (current - a) / a * 100.0)
}

/// Grade the current amount against the trailing short window
///
/// With no variance in the window, any amount above the mean is elevated.
fn severity(current: f64, window: &[f64]) -> Severity {
    if window.len() < SHORT_WINDOW {
        return Severity::Normal;
    }

    let mean = average(window);
    let sd = std_dev(window, mean);
    if sd > 0.0 {
        let z = (current - mean).abs() / sd;
        if z > 2.0 {
            Severity::Anomalous
        } else if z > 1.0 {
            Severity::Elevated
        } else {
            Severity::Normal
        }
    } else if current > mean {
        Severity::Elevated
    } else {
        Severity::Normal
    }
}

fn category_trend(values: &[f64]) -> CategoryTrend {
    if values.len() < 3 {
        return CategoryTrend::Unknown;
    }

    let slope = linear_slope(values);
    let threshold = average(values) * TREND_DEAD_BAND;
    if slope > threshold {
        CategoryTrend::Increasing
    } else if slope < -threshold {
        CategoryTrend::Decreasing
    } else {
        CategoryTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(month: &str, category: &str, amount: i64) -> CategoryTotal {
        CategoryTotal {
            month: month.to_string(),
            category: category.to_string(),
            kind: TransactionType::Expense,
            total_amount: amount,
        }
    }

    fn find<'a>(result: &'a SpendingComparisonResult, category: &str) -> &'a CategoryComparison {
        result
            .categories
            .iter()
            .find(|c| c.category == category)
            .unwrap()
    }

    #[test]
    fn test_no_expenses() {
        let income = CategoryTotal {
            month: "2026-01".to_string(),
            category: "Salary".to_string(),
            kind: TransactionType::Income,
            total_amount: 5000,
        };
        let result = analyze_spending_comparison(&[income], "2026-01");
        assert!(result.categories.is_empty());
        assert_eq!(result.total_previous_month_expense, None);
        assert_eq!(result.total_change_rate, None);
    }

    #[test]
    fn test_first_month_categories_are_new() {
        let result = analyze_spending_comparison(
            &[total("2026-01", "Food", 300), total("2026-01", "Rent", 0)],
            "2026-01",
        );
        assert_eq!(result.new_categories, vec!["Food".to_string()]);
        assert_eq!(result.total_current_expense, 300);
        assert_eq!(find(&result, "Food").trend_direction, CategoryTrend::Unknown);
        assert_eq!(find(&result, "Food").three_month_avg, None);
    }

    #[test]
    fn test_totals_and_proportions() {
        let result = analyze_spending_comparison(
            &[
                total("2026-01", "Food", 200),
                total("2026-01", "Rent", 800),
                total("2026-02", "Food", 500),
                total("2026-02", "Rent", 1500),
            ],
            "2026-02",
        );

        assert_eq!(result.total_current_expense, 2000);
        assert_eq!(result.total_previous_month_expense, Some(1000));
        assert_eq!(result.total_change_rate, Some(100.0));

        let food = find(&result, "Food");
        assert_eq!(food.proportion_of_total, 25.0);
        assert_eq!(food.previous_proportion_of_total, Some(20.0));
        assert!(result.new_categories.is_empty());
    }

    #[test]
    fn test_severity_against_three_month_window() {
        let mut totals = Vec::new();
        for (month, food, rent, fun) in [
            ("2026-01", 100, 1000, 50),
            ("2026-02", 120, 1000, 60),
            ("2026-03", 110, 1000, 55),
            ("2026-04", 400, 1200, 58),
        ] {
            totals.push(total(month, "Food", food));
            totals.push(total(month, "Rent", rent));
            totals.push(total(month, "Fun", fun));
        }

        let result = analyze_spending_comparison(&totals, "2026-04");

        assert_eq!(find(&result, "Food").severity, Severity::Anomalous);
        // Zero variance and above the mean
        assert_eq!(find(&result, "Rent").severity, Severity::Elevated);
        assert_eq!(find(&result, "Fun").severity, Severity::Normal);
        assert_eq!(result.anomalous_count, 1);
        assert_eq!(result.elevated_count, 1);

        // Ranked anomalous, elevated, normal
        let order: Vec<&str> = result.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["Food", "Rent", "Fun"]);

        let food = find(&result, "Food");
        assert_eq!(food.three_month_avg, Some(110.0));
        assert_eq!(food.deviation_from_three_month, Some(290.0));
        assert_eq!(food.six_month_avg, None);
        assert_eq!(food.trend_direction, CategoryTrend::Increasing);

        let increasing: Vec<&str> = result
            .top_increasing
            .iter()
            .map(|m| m.category.as_str())
            .collect();
        assert_eq!(increasing, vec!["Food", "Rent", "Fun"]);
        assert!(result.top_decreasing.is_empty());
    }

    #[test]
    fn test_zero_variance_at_mean_is_normal() {
        let totals = vec![
            total("2026-01", "Gym", 50),
            total("2026-02", "Gym", 50),
            total("2026-03", "Gym", 50),
            total("2026-04", "Gym", 20),
        ];
        let result = analyze_spending_comparison(&totals, "2026-04");
        let gym = find(&result, "Gym");
        assert_eq!(gym.severity, Severity::Normal);
        assert_eq!(result.top_decreasing[0].diff, -30.0);
        assert_eq!(result.top_decreasing[0].diff_pct, Some(-60.0));
    }

    #[test]
    fn test_missing_months_count_as_zero() {
        let totals = vec![
            total("2026-01", "Travel", 900),
            total("2026-02", "Food", 100),
            total("2026-03", "Food", 100),
            total("2026-04", "Food", 100),
        ];
        let result = analyze_spending_comparison(&totals, "2026-04");
        let travel = find(&result, "Travel");
        assert_eq!(travel.current_amount, 0);
        assert_eq!(travel.three_month_avg, Some(300.0));
        assert_eq!(travel.deviation_from_three_month_pct, Some(-100.0));
    }

    /// Six earlier months plus the latest, with ties inside each severity
    fn seven_month_totals() -> Vec<CategoryTotal> {
        let months = [
            "2026-01", "2026-02", "2026-03", "2026-04", "2026-05", "2026-06", "2026-07",
        ];
        // Listed so that first-seen order differs from the ranked order
        let series: [(&str, [i64; 7]); 8] = [
            ("Phone", [50, 50, 50, 50, 50, 50, 40]),
            ("Gym", [80, 80, 80, 80, 80, 80, 90]),
            ("Food", [200, 200, 200, 200, 200, 200, 250]),
            ("Travel", [800, 800, 800, 500, 500, 500, 100]),
            ("Fun", [100, 100, 100, 100, 100, 100, 120]),
            ("Taxi", [40, 40, 40, 40, 40, 40, 20]),
            ("Rent", [1000, 1000, 1000, 1000, 1000, 1000, 1300]),
            ("Books", [60, 60, 60, 60, 60, 60, 30]),
        ];

        let mut totals = Vec::new();
        for (i, month) in months.iter().enumerate() {
            for (category, amounts) in &series {
                totals.push(total(month, category, amounts[i]));
            }
        }
        totals
    }

    #[test]
    fn test_same_severity_ranked_by_deviation() {
        let result = analyze_spending_comparison(&seven_month_totals(), "2026-07");

        assert_eq!(result.anomalous_count, 0);
        assert_eq!(result.elevated_count, 4);

        // Elevated by |diff| 300, 50, 20, 10; then normal by 400, 30, 20, 10
        let order: Vec<&str> = result.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(
            order,
            vec!["Rent", "Food", "Fun", "Gym", "Travel", "Books", "Taxi", "Phone"]
        );
    }

    #[test]
    fn test_six_month_window() {
        let result = analyze_spending_comparison(&seven_month_totals(), "2026-07");

        let travel = find(&result, "Travel");
        assert_eq!(travel.three_month_avg, Some(500.0));
        assert_eq!(travel.six_month_avg, Some(650.0));
        assert_eq!(travel.deviation_from_three_month, Some(-400.0));
        assert_eq!(travel.deviation_from_six_month, Some(-550.0));
        assert_eq!(travel.deviation_from_three_month_pct, Some(-80.0));
        let pct = travel.deviation_from_six_month_pct.unwrap();
        assert!((pct - (-550.0 / 650.0 * 100.0)).abs() < 1e-9);
        assert_eq!(travel.trend_direction, CategoryTrend::Decreasing);

        let rent = find(&result, "Rent");
        assert_eq!(rent.six_month_avg, Some(1000.0));
        assert_eq!(rent.deviation_from_six_month_pct, Some(30.0));
    }

    #[test]
    fn test_top_moves_capped_at_three() {
        let result = analyze_spending_comparison(&seven_month_totals(), "2026-07");

        let increasing: Vec<(&str, f64)> = result
            .top_increasing
            .iter()
            .map(|m| (m.category.as_str(), m.diff))
            .collect();
        assert_eq!(increasing, vec![("Rent", 300.0), ("Food", 50.0), ("Fun", 20.0)]);

        let decreasing: Vec<(&str, f64)> = result
            .top_decreasing
            .iter()
            .map(|m| (m.category.as_str(), m.diff))
            .collect();
        assert_eq!(decreasing, vec![("Travel", -400.0), ("Books", -30.0), ("Taxi", -20.0)]);
    }
}
