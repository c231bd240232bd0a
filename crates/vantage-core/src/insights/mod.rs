//! Insight Engine - trend and risk analysis over monthly history
//!
//! Where the metrics describe the current snapshot, the analyzers here look
//! at how things moved month to month. Their results feed the narrative
//! stage, which calls them as tools.
//!
//! ## Analyzers
//!
//! - **MoM Trend** - month-over-month diffs, streaks, acceleration
//! - **Income Stability** - spread, outliers and trend of income
//! - **Savings Trajectory** - savings rate and emergency-fund direction
//! - **Spending Comparison** - categories against trailing averages
//! - **Portfolio Risk** - concentration, volatility, gains and losses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vantage_core::insights::{AnalysisContext, InsightEngine};
//!
//! let ctx = AnalysisContext::from_data(&data, &config, &month);
//! let bundle = InsightEngine::from_config(&config).analyze_all(&ctx);
//! ```

pub mod engine;
pub mod income_stability;
pub mod mom_trend;
pub mod portfolio_risk;
pub mod savings_trajectory;
pub mod spending_comparison;
pub mod types;

pub use engine::{AnalysisBundle, AnalysisContext, InsightEngine};
pub use income_stability::analyze_income_stability;
pub use mom_trend::{analyze_mom_trend, MomTrendAnalyzer};
pub use portfolio_risk::analyze_portfolio_risk;
pub use savings_trajectory::{analyze_savings_trajectory, SavingsInput};
pub use spending_comparison::analyze_spending_comparison;
pub use types::{
    Acceleration, AnalyzerKind, CategoryComparison, CategoryMove, CategoryTrend, Concentration,
    DailyChange, HoldingGain, HoldingShare, IncomeOutlier, IncomeStability, IncomeStabilityResult,
    IncomeTrend, LatestVsAverage, MeanComparison, MomTrendResult, MonthComparison, MonthIncome,
    MonthNet, OverallTrend, PeriodAverage, PortfolioRiskResult, PrimaryFactor, RiskLevel,
    SavingsRatePoint, SavingsTrajectoryResult, Severity, SpendingComparisonResult,
    TrajectoryDirection, TrendStreaks, VolatileHolding,
};
