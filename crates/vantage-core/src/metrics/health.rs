//! Health score engine
//!
//! Five independent sub-scores, each a clamped piecewise-linear curve,
//! summed into a 0-100 composite. Every sub-score is rounded to a whole
//! number before summing so the parts always add up to the total.

use serde::{Deserialize, Serialize};

use crate::stats::round_half_up;

pub const EMERGENCY_FUND_MAX: u32 = 25;
pub const SAVINGS_RATE_MAX: u32 = 25;
pub const DIVERSIFICATION_MAX: u32 = 20;
pub const ASSET_GROWTH_MAX: u32 = 15;
pub const SPENDING_STABILITY_MAX: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCategory {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub total_score: u32,
    pub categories: Vec<ScoreCategory>,
}

/// The aggregator outputs the health score depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    pub emergency_fund_months: f64,
    pub savings_rate: f64,
    pub diversification_score: u32,
    pub monthly_growth_rate: f64,
    pub anomaly_count: usize,
}

/// Linear interpolation with the fraction clamped to [0, 1]
///
/// A degenerate input range maps everything to `out_max`.
fn lerp(value: f64, min: f64, max: f64, out_min: f64, out_max: f64) -> f64 {
    if max == min {
        return out_max;
    }
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    out_min + t * (out_max - out_min)
}

fn rounded(value: f64) -> u32 {
    round_half_up(value).max(0.0) as u32
}

pub fn score_emergency_fund(months: f64) -> u32 {
    if months >= 6.0 {
        return EMERGENCY_FUND_MAX;
    }
    if months <= 0.0 {
        return 0;
    }
    if months <= 3.0 {
        return rounded(lerp(months, 0.0, 3.0, 0.0, 15.0));
    }
    rounded(lerp(months, 3.0, 6.0, 15.0, 25.0))
}

pub fn score_savings_rate(rate: f64) -> u32 {
    if rate >= 30.0 {
        return SAVINGS_RATE_MAX;
    }
    if rate <= 0.0 {
        return 0;
    }
    if rate <= 10.0 {
        return rounded(lerp(rate, 0.0, 10.0, 0.0, 8.0));
    }
    if rate <= 20.0 {
        return rounded(lerp(rate, 10.0, 20.0, 8.0, 17.0));
    }
    rounded(lerp(rate, 20.0, 30.0, 17.0, 25.0))
}

pub fn score_diversification(diversification_score: u32) -> u32 {
    let clamped = diversification_score.min(100) as f64;
    rounded(clamped / 100.0 * DIVERSIFICATION_MAX as f64)
}

pub fn score_growth(monthly_growth_rate: f64) -> u32 {
    if monthly_growth_rate >= 0.02 {
        return ASSET_GROWTH_MAX;
    }
    if monthly_growth_rate <= -0.02 {
        return 0;
    }
    rounded(lerp(monthly_growth_rate, -0.02, 0.02, 0.0, 15.0))
}

pub fn score_spending_stability(anomaly_count: usize) -> u32 {
    match anomaly_count {
        0 => SPENDING_STABILITY_MAX,
        1 => 10,
        2 => 5,
        _ => 0,
    }
}

pub fn calculate_health_score(inputs: &ScoreInputs) -> HealthScore {
    let category = |name: &str, score: u32, max_score: u32| ScoreCategory {
        name: name.to_string(),
        score,
        max_score,
    };

    let categories = vec![
        category(
            "Emergency fund",
            score_emergency_fund(inputs.emergency_fund_months),
            EMERGENCY_FUND_MAX,
        ),
        category(
            "Savings rate",
            score_savings_rate(inputs.savings_rate),
            SAVINGS_RATE_MAX,
        ),
        category(
            "Diversification",
            score_diversification(inputs.diversification_score),
            DIVERSIFICATION_MAX,
        ),
        category(
            "Asset growth",
            score_growth(inputs.monthly_growth_rate),
            ASSET_GROWTH_MAX,
        ),
        category(
            "Spending stability",
            score_spending_stability(inputs.anomaly_count),
            SPENDING_STABILITY_MAX,
        ),
    ];

    HealthScore {
        total_score: categories.iter().map(|c| c.score).sum(),
        categories,
    }
}
