//! Investment aggregator: investment holdings, unrealized gain and a
//! Herfindahl-based diversification score

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::models::CollectedData;
use crate::stats::{round_half_up, round_to};

/// Score for a portfolio made of a single holding
const SINGLE_HOLDING_SCORE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentHolding {
    pub name: String,
    pub amount: i64,
    pub unrealized_gain: i64,
    pub unrealized_gain_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    pub holdings: Vec<InvestmentHolding>,
    pub total_investment: i64,
    pub total_unrealized_gain: i64,
    /// Gain over cost basis in percent, 2 decimals
    pub total_unrealized_gain_pct: f64,
    /// 0-100
    pub diversification_score: u32,
}

pub fn calculate_investment(data: &CollectedData, config: &AnalyticsConfig) -> InvestmentMetrics {
    let holdings: Vec<InvestmentHolding> = data
        .assets()
        .filter(|h| {
            h.category_name
                .as_deref()
                .is_some_and(|c| config.is_investment_category(c))
        })
        .map(|h| InvestmentHolding {
            name: h.name.clone(),
            amount: h.amount,
            unrealized_gain: h.unrealized_gain.unwrap_or(0),
            unrealized_gain_pct: h.unrealized_gain_pct.unwrap_or(0.0),
        })
        .collect();

    let total_investment: i64 = holdings.iter().map(|h| h.amount).sum();
    let total_unrealized_gain: i64 = holdings.iter().map(|h| h.unrealized_gain).sum();
    let cost_basis = total_investment - total_unrealized_gain;
    let total_unrealized_gain_pct = if cost_basis > 0 {
        round_to(total_unrealized_gain as f64 / cost_basis as f64 * 100.0, 2)
    } else {
        0.0
    };

    let amounts: Vec<i64> = holdings.iter().map(|h| h.amount).collect();
    let diversification_score = diversification_score(&amounts);

    InvestmentMetrics {
        holdings,
        total_investment,
        total_unrealized_gain,
        total_unrealized_gain_pct,
        diversification_score,
    }
}

/// `100 * (1 - Σw²)` over holding weights, clamped to 0-100
///
/// No holdings scores 0 and a single holding scores 10.
pub fn diversification_score(amounts: &[i64]) -> u32 {
    match amounts.len() {
        0 => return 0,
        1 => return SINGLE_HOLDING_SCORE,
        _ => {}
    }

    let total: i64 = amounts.iter().sum();
    if total == 0 {
        return 0;
    }

    let herfindahl: f64 = amounts
        .iter()
        .map(|&a| {
            let w = a as f64 / total as f64;
            w * w
        })
        .sum();

    round_half_up((1.0 - herfindahl) * 100.0).clamp(0.0, 100.0) as u32
}
