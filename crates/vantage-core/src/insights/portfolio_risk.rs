//! Portfolio risk analyzer: concentration, volatility and gain/loss spread

use std::collections::HashMap;

use crate::metrics::InvestmentHolding;

use super::types::{
    Concentration, DailyChange, HoldingGain, HoldingShare, PortfolioRiskResult, RiskLevel,
    VolatileHolding,
};

const TOP_CONCENTRATION: usize = 3;
const MAX_VOLATILE: usize = 5;

pub fn analyze_portfolio_risk(
    holdings: &[InvestmentHolding],
    daily_changes: &[DailyChange],
    diversification_score: u32,
) -> PortfolioRiskResult {
    if holdings.is_empty() {
        return PortfolioRiskResult {
            top_concentration: Concentration::default(),
            max_holding: None,
            volatile_holdings: Vec::new(),
            risk_level: RiskLevel::Low,
            max_gain_holding: None,
            max_loss_holding: None,
            total_daily_change: 0,
            total_daily_change_pct: 0.0,
            holdings_count: 0,
            positive_count: 0,
            negative_count: 0,
            total_unrealized_gain: 0,
            total_unrealized_gain_pct: 0.0,
        };
    }

    let total_value: i64 = holdings.iter().map(|h| h.amount).sum();
    let pct_of_value = |amount: i64| {
        if total_value > 0 {
            amount as f64 / total_value as f64 * 100.0
        } else {
            0.0
        }
    };

    let total_unrealized_gain: i64 = holdings.iter().map(|h| h.unrealized_gain).sum();
    let cost_basis = total_value - total_unrealized_gain;
    let total_unrealized_gain_pct = if cost_basis > 0 {
        total_unrealized_gain as f64 / cost_basis as f64 * 100.0
    } else {
        0.0
    };

    let mut by_size: Vec<&InvestmentHolding> = holdings.iter().collect();
    by_size.sort_by(|a, b| b.amount.cmp(&a.amount));
    let top: Vec<&InvestmentHolding> = by_size.iter().take(TOP_CONCENTRATION).copied().collect();
    let top_pct = pct_of_value(top.iter().map(|h| h.amount).sum());

    let max_holding = by_size
        .first()
        .filter(|_| total_value > 0)
        .map(|h| HoldingShare {
            name: h.name.clone(),
            pct: pct_of_value(h.amount),
        });

    let change_by_name: HashMap<&str, i64> = daily_changes
        .iter()
        .map(|d| (d.name.as_str(), d.daily_change))
        .collect();
    let total_daily_change: i64 = daily_changes.iter().map(|d| d.daily_change).sum();

    let mut volatile_holdings: Vec<VolatileHolding> = holdings
        .iter()
        .map(|h| {
            let daily_change = change_by_name.get(h.name.as_str()).copied().unwrap_or(0);
            VolatileHolding {
                name: h.name.clone(),
                daily_change,
                portfolio_impact_pct: pct_of_value(daily_change.abs()),
            }
        })
        .filter(|v| v.daily_change != 0)
        .collect();
    volatile_holdings.sort_by(|a, b| b.daily_change.abs().cmp(&a.daily_change.abs()));
    volatile_holdings.truncate(MAX_VOLATILE);

    let risk_level = if diversification_score < 30 || top_pct > 80.0 {
        RiskLevel::High
    } else if diversification_score < 60 || top_pct > 60.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let gain = |h: &InvestmentHolding| HoldingGain {
        name: h.name.clone(),
        unrealized_gain: h.unrealized_gain,
        unrealized_gain_pct: h.unrealized_gain_pct,
    };
    let max_gain_holding = holdings
        .iter()
        .filter(|h| h.unrealized_gain > 0)
        .reduce(|best, h| if h.unrealized_gain > best.unrealized_gain { h } else { best })
        .map(gain);
    let max_loss_holding = holdings
        .iter()
        .filter(|h| h.unrealized_gain < 0)
        .reduce(|worst, h| if h.unrealized_gain < worst.unrealized_gain { h } else { worst })
        .map(gain);

    PortfolioRiskResult {
        top_concentration: Concentration {
            names: top.iter().map(|h| h.name.clone()).collect(),
            total_pct: top_pct,
        },
        max_holding,
        volatile_holdings,
        risk_level,
        max_gain_holding,
        max_loss_holding,
        total_daily_change,
        total_daily_change_pct: pct_of_value(total_daily_change),
        holdings_count: holdings.len(),
        positive_count: holdings.iter().filter(|h| h.unrealized_gain > 0).count(),
        negative_count: holdings.iter().filter(|h| h.unrealized_gain < 0).count(),
        total_unrealized_gain,
        total_unrealized_gain_pct,
    }
}
