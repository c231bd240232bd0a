//! Analyzer result types
//!
//! Every result is a request-scoped view over the monthly series; nothing
//! here is persisted. Enum values serialize as snake_case strings and
//! unavailable values as `null`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stats::Streak;

/// The five trend and risk analyzers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    MomTrend,
    IncomeStability,
    SavingsTrajectory,
    SpendingComparison,
    PortfolioRisk,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 5] = [
        AnalyzerKind::MomTrend,
        AnalyzerKind::IncomeStability,
        AnalyzerKind::SavingsTrajectory,
        AnalyzerKind::SpendingComparison,
        AnalyzerKind::PortfolioRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::MomTrend => "mom_trend",
            AnalyzerKind::IncomeStability => "income_stability",
            AnalyzerKind::SavingsTrajectory => "savings_trajectory",
            AnalyzerKind::SpendingComparison => "spending_comparison",
            AnalyzerKind::PortfolioRisk => "portfolio_risk",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::MomTrend => "Month-over-Month Trend",
            AnalyzerKind::IncomeStability => "Income Stability",
            AnalyzerKind::SavingsTrajectory => "Savings Trajectory",
            AnalyzerKind::SpendingComparison => "Spending Comparison",
            AnalyzerKind::PortfolioRisk => "Portfolio Risk",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mom_trend" => Ok(AnalyzerKind::MomTrend),
            "income_stability" => Ok(AnalyzerKind::IncomeStability),
            "savings_trajectory" => Ok(AnalyzerKind::SavingsTrajectory),
            "spending_comparison" => Ok(AnalyzerKind::SpendingComparison),
            "portfolio_risk" => Ok(AnalyzerKind::PortfolioRisk),
            _ => Err(format!("Unknown analyzer: {}", s)),
        }
    }
}

// =============================================================================
// Month-over-month trend
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTrend {
    Improving,
    Worsening,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceleration {
    Accelerating,
    Decelerating,
    Steady,
}

/// One month against the month before it; diffs and rates are `None`
/// for the first month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub month: String,
    pub total_income: i64,
    pub total_expense: i64,
    pub net_income: i64,
    pub savings_rate: f64,
    pub income_diff: Option<i64>,
    pub expense_diff: Option<i64>,
    pub net_income_diff: Option<i64>,
    pub income_change_rate: Option<f64>,
    pub expense_change_rate: Option<f64>,
    pub net_income_change_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStreaks {
    pub income_streak: Streak,
    pub expense_streak: Streak,
    pub net_income_streak: Streak,
    pub savings_rate_streak: Streak,
}

impl Default for TrendStreaks {
    fn default() -> Self {
        Self {
            income_streak: Streak::none(),
            expense_streak: Streak::none(),
            net_income_streak: Streak::none(),
            savings_rate_streak: Streak::none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthNet {
    pub month: String,
    pub net_income: i64,
}

/// Rolling average over a trailing window of months
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAverage {
    pub income: f64,
    pub expense: f64,
    pub net_income: f64,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVsAverage {
    pub income_diff: f64,
    pub income_diff_pct: f64,
    pub expense_diff: f64,
    pub expense_diff_pct: f64,
    pub net_income_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomTrendResult {
    pub latest_month_partial: bool,
    pub monthly_comparisons: Vec<MonthComparison>,
    pub streaks: TrendStreaks,
    pub overall_trend: OverallTrend,
    pub acceleration: Acceleration,
    pub best_month: Option<MonthNet>,
    pub worst_month: Option<MonthNet>,
    pub three_month_avg: Option<PeriodAverage>,
    pub six_month_avg: Option<PeriodAverage>,
    pub latest_vs_three_month_avg: Option<LatestVsAverage>,
}

// =============================================================================
// Income stability
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStability {
    VeryStable,
    Stable,
    Variable,
    HighlyVariable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTrend {
    Increasing,
    Decreasing,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeOutlier {
    pub month: String,
    pub income: i64,
    pub deviation_from_mean: f64,
    pub deviation_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthIncome {
    pub month: String,
    pub income: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeanComparison {
    pub diff: f64,
    pub diff_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStabilityResult {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Percent
    pub coefficient_of_variation: f64,
    pub stability: IncomeStability,
    pub outlier_months: Vec<IncomeOutlier>,
    pub trend: IncomeTrend,
    pub trend_slope_per_month: f64,
    pub min_month: Option<MonthIncome>,
    pub max_month: Option<MonthIncome>,
    pub latest_vs_mean: Option<MeanComparison>,
}

// =============================================================================
// Savings trajectory
// =============================================================================

/// Used both for the emergency-fund direction and the savings-rate trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryFactor {
    ExpenseIncrease,
    ExpenseDecrease,
    AssetIncrease,
    AssetDecrease,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRatePoint {
    pub month: String,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTrajectoryResult {
    pub current_emergency_fund_months: f64,
    pub previous_emergency_fund_months: Option<f64>,
    pub emergency_fund_change: Option<f64>,
    pub direction: TrajectoryDirection,
    pub primary_factor: PrimaryFactor,
    pub months_to_six_month_target: Option<u32>,
    pub savings_rate_history: Vec<SavingsRatePoint>,
    pub average_savings_rate: f64,
    pub savings_rate_trend: TrajectoryDirection,
    pub cumulative_net_income: i64,
    /// Liquid assets as a percent of total assets
    pub liquid_assets_to_total_ratio: f64,
}

// =============================================================================
// Spending comparison
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Elevated,
    Anomalous,
}

impl Severity {
    /// Sort priority (lower sorts first)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Anomalous => 0,
            Severity::Elevated => 1,
            Severity::Normal => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTrend {
    Increasing,
    Decreasing,
    Stable,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    pub category: String,
    pub current_amount: i64,
    pub three_month_avg: Option<f64>,
    pub six_month_avg: Option<f64>,
    pub deviation_from_three_month: Option<f64>,
    pub deviation_from_three_month_pct: Option<f64>,
    pub deviation_from_six_month: Option<f64>,
    pub deviation_from_six_month_pct: Option<f64>,
    pub severity: Severity,
    pub trend_direction: CategoryTrend,
    pub proportion_of_total: f64,
    pub previous_proportion_of_total: Option<f64>,
}

/// A category's move against its 3-month average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMove {
    pub category: String,
    pub diff: f64,
    /// `None` when the average was 0
    pub diff_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingComparisonResult {
    pub categories: Vec<CategoryComparison>,
    pub new_categories: Vec<String>,
    pub total_current_expense: i64,
    pub total_previous_month_expense: Option<i64>,
    pub total_change_rate: Option<f64>,
    pub anomalous_count: usize,
    pub elevated_count: usize,
    pub top_increasing: Vec<CategoryMove>,
    pub top_decreasing: Vec<CategoryMove>,
}

// =============================================================================
// Portfolio risk
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Day-over-day value change of a named holding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChange {
    pub name: String,
    pub daily_change: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    pub names: Vec<String>,
    pub total_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingShare {
    pub name: String,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatileHolding {
    pub name: String,
    pub daily_change: i64,
    pub portfolio_impact_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingGain {
    pub name: String,
    pub unrealized_gain: i64,
    pub unrealized_gain_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRiskResult {
    pub top_concentration: Concentration,
    pub max_holding: Option<HoldingShare>,
    pub volatile_holdings: Vec<VolatileHolding>,
    pub risk_level: RiskLevel,
    pub max_gain_holding: Option<HoldingGain>,
    pub max_loss_holding: Option<HoldingGain>,
    pub total_daily_change: i64,
    pub total_daily_change_pct: f64,
    pub holdings_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub total_unrealized_gain: i64,
    pub total_unrealized_gain_pct: f64,
}
