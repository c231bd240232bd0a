//! Statistical primitives shared by the aggregators and analyzers
//!
//! Every function is total: empty or degenerate input yields 0 (or `None`
//! for change rates) instead of NaN or a panic.

use serde::{Deserialize, Serialize};

/// Arithmetic mean, 0 for an empty slice
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median, averaging the two central values for even lengths
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Population standard deviation around `mean`; 0 below two samples
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentage change from `previous` to `current`
///
/// `None` when `previous` is zero: the rate is unavailable, not 0%.
pub fn change_rate(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

/// Least-squares slope of `values` against their index
///
/// Needs at least three points; anything shorter is treated as flat.
pub fn linear_slope(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    let n = values.len();
    let y_mean = average(values);
    let x_mean = (n - 1) as f64 / 2.0;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, value) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (value - y_mean);
        denominator += dx * dx;
    }

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Savings rate in percent; 0 when there is no income
pub fn savings_rate(income: f64, expense: f64) -> f64 {
    if income == 0.0 {
        return 0.0;
    }
    (income - expense) / income * 100.0
}

/// Direction of a monotonic run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakDirection {
    Increasing,
    Decreasing,
    #[serde(rename = "none")]
    Flat,
}

impl StreakDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakDirection::Increasing => "increasing",
            StreakDirection::Decreasing => "decreasing",
            StreakDirection::Flat => "none",
        }
    }
}

/// Trailing run of strictly monotonic month-over-month moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub direction: StreakDirection,
    pub months: u32,
}

impl Streak {
    pub fn none() -> Self {
        Self {
            direction: StreakDirection::Flat,
            months: 0,
        }
    }
}

/// Walk backwards from the latest value counting consecutive moves in the
/// same direction. An unchanged value ends the run.
pub fn streak(values: &[f64]) -> Streak {
    if values.len() < 2 {
        return Streak::none();
    }

    let mut result = Streak::none();
    for pair in values.windows(2).rev() {
        let diff = pair[1] - pair[0];
        let current = if diff > 0.0 {
            StreakDirection::Increasing
        } else if diff < 0.0 {
            StreakDirection::Decreasing
        } else {
            break;
        };

        if result.direction == StreakDirection::Flat {
            result = Streak {
                direction: current,
                months: 1,
            };
        } else if result.direction == current {
            result.months += 1;
        } else {
            break;
        }
    }

    result
}

/// Round half toward positive infinity, the way the reporting layer does
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to a fixed number of decimal places (half toward positive infinity)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

/// Round to the nearest whole currency unit
pub fn round_currency(value: f64) -> i64 {
    round_half_up(value) as i64
}
