//! Insight Engine - runs the trend and risk analyzers over one snapshot

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::metrics::{calculate_investment, calculate_savings, InvestmentHolding};
use crate::models::{
    category_totals, monthly_summaries, CategoryTotal, CollectedData, MonthlySummary,
    ReportingMonth,
};

use super::income_stability::analyze_income_stability;
use super::mom_trend::MomTrendAnalyzer;
use super::portfolio_risk::analyze_portfolio_risk;
use super::savings_trajectory::{analyze_savings_trajectory, SavingsInput};
use super::spending_comparison::analyze_spending_comparison;
use super::types::{
    AnalyzerKind, DailyChange, IncomeStabilityResult, MomTrendResult, PortfolioRiskResult,
    SavingsTrajectoryResult, SpendingComparisonResult,
};

/// Immutable inputs shared by every analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContext {
    /// Chronological, in-progress month already removed
    pub monthly_summaries: Vec<MonthlySummary>,
    pub category_totals: Vec<CategoryTotal>,
    pub savings: SavingsInput,
    pub holdings: Vec<InvestmentHolding>,
    pub daily_changes: Vec<DailyChange>,
    pub diversification_score: u32,
    /// Last complete month with transactions
    pub latest_month: Option<String>,
}

impl AnalysisContext {
    /// Build the analyzer inputs from a snapshot, dropping the in-progress
    /// `current` month's transactions first
    pub fn from_data(data: &CollectedData, config: &AnalyticsConfig, current: &ReportingMonth) -> Self {
        let scoped = data.without_month(current);

        let monthly_summaries = monthly_summaries(&scoped.transactions);
        let category_totals = category_totals(&scoped.transactions, &config.uncategorized_label);
        let investment = calculate_investment(&scoped, config);

        let daily_changes = scoped
            .assets()
            .filter(|h| {
                h.category_name
                    .as_deref()
                    .is_some_and(|c| config.is_investment_category(c))
            })
            .filter_map(|h| {
                h.daily_change.map(|daily_change| DailyChange {
                    name: h.name.clone(),
                    daily_change,
                })
            })
            .collect();

        tracing::debug!(
            current_month = %current,
            months = monthly_summaries.len(),
            dropped = data.transactions.len() - scoped.transactions.len(),
            "Built analysis context"
        );

        Self {
            latest_month: monthly_summaries.last().map(|m| m.month.clone()),
            monthly_summaries,
            category_totals,
            savings: calculate_savings(&scoped),
            holdings: investment.holdings,
            daily_changes,
            diversification_score: investment.diversification_score,
        }
    }

    /// Copy keeping only the most recent `months` months of history
    pub fn last_months(&self, months: usize) -> Self {
        let mut ctx = self.clone();
        let skip = ctx.monthly_summaries.len().saturating_sub(months);
        ctx.monthly_summaries.drain(..skip);
        match ctx.monthly_summaries.first().map(|m| m.month.clone()) {
            Some(first) => ctx.category_totals.retain(|t| t.month >= first),
            None => {
                ctx.category_totals.clear();
                ctx.latest_month = None;
            }
        }
        ctx
    }
}

/// Results of one analysis run; analyzers that were not requested are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mom_trend: Option<MomTrendResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_stability: Option<IncomeStabilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_trajectory: Option<SavingsTrajectoryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending_comparison: Option<SpendingComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_risk: Option<PortfolioRiskResult>,
}

impl AnalysisBundle {
    pub fn is_empty(&self) -> bool {
        self.mom_trend.is_none()
            && self.income_stability.is_none()
            && self.savings_trajectory.is_none()
            && self.spending_comparison.is_none()
            && self.portfolio_risk.is_none()
    }
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    mom_trend: MomTrendAnalyzer,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the default thresholds
    pub fn new() -> Self {
        Self {
            mom_trend: MomTrendAnalyzer::new(),
        }
    }

    /// Engine with thresholds taken from config
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            mom_trend: MomTrendAnalyzer::with_thresholds(
                config.partial_month_ratio,
                config.acceleration_ratio,
            ),
        }
    }

    pub fn mom_trend(&self, ctx: &AnalysisContext) -> MomTrendResult {
        self.mom_trend.analyze(&ctx.monthly_summaries)
    }

    pub fn income_stability(&self, ctx: &AnalysisContext) -> IncomeStabilityResult {
        analyze_income_stability(&ctx.monthly_summaries)
    }

    pub fn savings_trajectory(&self, ctx: &AnalysisContext) -> SavingsTrajectoryResult {
        analyze_savings_trajectory(&ctx.savings, &ctx.monthly_summaries)
    }

    /// Compare against `latest_month`, else the context's latest month
    pub fn spending_comparison(
        &self,
        ctx: &AnalysisContext,
        latest_month: Option<&str>,
    ) -> SpendingComparisonResult {
        let month = latest_month
            .or(ctx.latest_month.as_deref())
            .unwrap_or_default();
        analyze_spending_comparison(&ctx.category_totals, month)
    }

    pub fn portfolio_risk(&self, ctx: &AnalysisContext) -> PortfolioRiskResult {
        analyze_portfolio_risk(&ctx.holdings, &ctx.daily_changes, ctx.diversification_score)
    }

    /// Run the requested analyzers (each at most once)
    pub fn analyze(&self, ctx: &AnalysisContext, kinds: &[AnalyzerKind]) -> AnalysisBundle {
        let mut bundle = AnalysisBundle::default();

        for kind in kinds {
            match kind {
                AnalyzerKind::MomTrend => bundle.mom_trend = Some(self.mom_trend(ctx)),
                AnalyzerKind::IncomeStability => {
                    bundle.income_stability = Some(self.income_stability(ctx))
                }
                AnalyzerKind::SavingsTrajectory => {
                    bundle.savings_trajectory = Some(self.savings_trajectory(ctx))
                }
                AnalyzerKind::SpendingComparison => {
                    bundle.spending_comparison = Some(self.spending_comparison(ctx, None))
                }
                AnalyzerKind::PortfolioRisk => {
                    bundle.portfolio_risk = Some(self.portfolio_risk(ctx))
                }
            }
            tracing::debug!(analyzer = kind.as_str(), "Analyzer complete");
        }

        bundle
    }

    /// Run all five analyzers
    pub fn analyze_all(&self, ctx: &AnalysisContext) -> AnalysisBundle {
        self.analyze(ctx, &AnalyzerKind::ALL)
    }
}
