//! Category aggregators and the health score
//!
//! Each aggregator is a pure function over one `CollectedData` snapshot.
//! [`compute_metrics`] runs all six and scores the result.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vantage_core::{compute_metrics, AnalyticsConfig, CollectedData};
//!
//! let metrics = compute_metrics(&data, &AnalyticsConfig::default());
//! println!("{}", metrics.health_score.total_score);
//! ```

pub mod balance;
pub mod growth;
pub mod health;
pub mod investment;
pub mod liability;
pub mod savings;
pub mod spending;

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::models::CollectedData;

pub use balance::{calculate_balance, BalanceMetrics, BalancePoint};
pub use growth::{calculate_growth, GrowthMetrics, Projection};
pub use health::{calculate_health_score, HealthScore, ScoreCategory, ScoreInputs};
pub use investment::{calculate_investment, diversification_score, InvestmentHolding, InvestmentMetrics};
pub use liability::{calculate_liability, LiabilityMetrics};
pub use savings::{calculate_savings, SavingsMetrics};
pub use spending::{calculate_spending, detect_anomalies, CategoryShare, SpendingAnomaly, SpendingMetrics};

/// Everything computed for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub savings: SavingsMetrics,
    pub investment: InvestmentMetrics,
    pub spending: SpendingMetrics,
    pub growth: GrowthMetrics,
    pub balance: BalanceMetrics,
    pub liability: LiabilityMetrics,
    pub health_score: HealthScore,
}

impl ScoreInputs {
    pub fn from_metrics(
        savings: &SavingsMetrics,
        balance: &BalanceMetrics,
        investment: &InvestmentMetrics,
        growth: &GrowthMetrics,
        spending: &SpendingMetrics,
    ) -> Self {
        Self {
            emergency_fund_months: savings.emergency_fund_months,
            savings_rate: balance.savings_rate,
            diversification_score: investment.diversification_score,
            monthly_growth_rate: growth.monthly_growth_rate,
            anomaly_count: spending.anomalies.len(),
        }
    }
}

/// Run all six aggregators and the health score over one snapshot
pub fn compute_metrics(data: &CollectedData, config: &AnalyticsConfig) -> AnalyticsMetrics {
    let savings = calculate_savings(data);
    let investment = calculate_investment(data, config);
    let spending = calculate_spending(data, config);
    let growth = calculate_growth(data);
    let balance = calculate_balance(data);
    let liability = calculate_liability(data, config);

    let health_score = calculate_health_score(&ScoreInputs::from_metrics(
        &savings,
        &balance,
        &investment,
        &growth,
        &spending,
    ));

    tracing::debug!(
        holdings = data.holdings.len(),
        transactions = data.transactions.len(),
        history = data.asset_history.len(),
        health_score = health_score.total_score,
        "Computed analytics metrics"
    );

    AnalyticsMetrics {
        savings,
        investment,
        spending,
        growth,
        balance,
        liability,
        health_score,
    }
}
