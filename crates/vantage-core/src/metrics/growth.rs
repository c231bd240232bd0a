//! Growth aggregator: compound monthly growth rate and 1/3/5-year projections

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::CollectedData;
use crate::stats::{round_currency, round_to};

const PROJECTION_YEARS: [u32; 3] = [1, 3, 5];
/// Monthly rates smaller than this in magnitude are treated as flat
const FLAT_RATE_EPSILON: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub years: u32,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    /// 4 decimals
    pub monthly_growth_rate: f64,
    /// `(1 + monthly)^12 - 1`, 3 decimals
    pub projected_annual_rate: f64,
    pub projections: Vec<Projection>,
}

impl GrowthMetrics {
    /// No growth: every horizon projects the current total
    fn flat(total_assets: i64) -> Self {
        Self {
            monthly_growth_rate: 0.0,
            projected_annual_rate: 0.0,
            projections: PROJECTION_YEARS
                .iter()
                .map(|&years| Projection {
                    years,
                    amount: total_assets,
                })
                .collect(),
        }
    }
}

pub fn calculate_growth(data: &CollectedData) -> GrowthMetrics {
    let total_assets = data.total_assets;
    if data.asset_history.len() < 2 {
        return GrowthMetrics::flat(total_assets);
    }

    let first = data.asset_history.iter().min_by_key(|s| s.date);
    let last = data.asset_history.iter().max_by_key(|s| s.date);
    let (Some(first), Some(last)) = (first, last) else {
        return GrowthMetrics::flat(total_assets);
    };
    if first.total_assets <= 0 {
        return GrowthMetrics::flat(total_assets);
    }

    let months_elapsed = (last.date.year() - first.date.year()) * 12
        + (last.date.month() as i32 - first.date.month() as i32);
    if months_elapsed <= 0 {
        return GrowthMetrics::flat(total_assets);
    }

    let ratio = last.total_assets as f64 / first.total_assets as f64;
    let monthly_growth_rate = round_to(ratio.powf(1.0 / months_elapsed as f64) - 1.0, 4);
    if !monthly_growth_rate.is_finite() || monthly_growth_rate.abs() < FLAT_RATE_EPSILON {
        return GrowthMetrics::flat(total_assets);
    }

    let annual_rate = (1.0 + monthly_growth_rate).powi(12) - 1.0;

    GrowthMetrics {
        monthly_growth_rate,
        projected_annual_rate: round_to(annual_rate, 3),
        projections: PROJECTION_YEARS
            .iter()
            .map(|&years| Projection {
                years,
                amount: round_currency(total_assets as f64 * (1.0 + annual_rate).powi(years as i32)),
            })
            .collect(),
    }
}
