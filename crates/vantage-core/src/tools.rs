//! Analysis tools for the narrative stage
//!
//! Each analyzer, plus the snapshot metrics, is exposed as a tool the
//! narrative stage can call while writing insights. Tools are read-only:
//! they compute over an already-built [`AnalysisContext`] and never touch
//! the underlying records.

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};
use crate::insights::{AnalysisContext, AnalyzerKind, InsightEngine};
use crate::metrics::compute_metrics;
use crate::models::{CollectedData, ReportingMonth};

pub const GET_FINANCIAL_METRICS: &str = "get_financial_metrics";

/// Tool definition (name, description and JSON schema of its input)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

// =============================================================================
// Parameters
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct FinancialMetricsParams {}

/// Shared by the analyzers that read the monthly series
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct MonthlyHistoryParams {
    /// Only look at the most recent N months
    #[schemars(description = "Limit the analysis to the most recent N complete months (default: all, up to 12)")]
    pub months: Option<usize>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SpendingComparisonParams {
    /// Month to compare (YYYY-MM)
    #[schemars(description = "Month to compare against earlier months, in YYYY-MM format (default: latest complete month)")]
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct PortfolioRiskParams {}

// =============================================================================
// Tool Definitions
// =============================================================================

/// All analysis tools
pub fn analysis_tools() -> Vec<Tool> {
    vec![
        Tool::new(
            GET_FINANCIAL_METRICS,
            "Get the current snapshot metrics: savings, investment, spending, growth, \
             balance, liabilities and the 0-100 financial health score.",
            schemars::schema_for!(FinancialMetricsParams).into(),
        ),
        Tool::new(
            AnalyzerKind::MomTrend.as_str(),
            "Month-over-month comparison of income, expense and net income with streaks, \
             acceleration, best/worst months and rolling averages.",
            schemars::schema_for!(MonthlyHistoryParams).into(),
        ),
        Tool::new(
            AnalyzerKind::IncomeStability.as_str(),
            "Income mean, median, spread and stability bucket, with outlier months and trend.",
            schemars::schema_for!(MonthlyHistoryParams).into(),
        ),
        Tool::new(
            AnalyzerKind::SavingsTrajectory.as_str(),
            "Savings rate history and trend, emergency fund direction with its main driver, \
             and months until six months of expenses are covered.",
            schemars::schema_for!(MonthlyHistoryParams).into(),
        ),
        Tool::new(
            AnalyzerKind::SpendingComparison.as_str(),
            "Compare each spending category's month with its 3- and 6-month averages. \
             Use this to find unusual or growing categories.",
            schemars::schema_for!(SpendingComparisonParams).into(),
        ),
        Tool::new(
            AnalyzerKind::PortfolioRisk.as_str(),
            "Investment concentration, risk level, most volatile holdings and largest gains/losses.",
            schemars::schema_for!(PortfolioRiskParams).into(),
        ),
    ]
}

// =============================================================================
// Dispatch
// =============================================================================

/// Everything the tools compute over, built once per report
///
/// The in-progress month is dropped once, up front, so the metrics tool and
/// the analyzers all see the same complete months.
pub struct AnalysisToolbox<'a> {
    data: CollectedData,
    config: &'a AnalyticsConfig,
    context: AnalysisContext,
    engine: InsightEngine,
}

impl<'a> AnalysisToolbox<'a> {
    pub fn new(data: &CollectedData, config: &'a AnalyticsConfig, current: &ReportingMonth) -> Self {
        Self {
            data: data.without_month(current),
            config,
            context: AnalysisContext::from_data(data, config, current),
            engine: InsightEngine::from_config(config),
        }
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.context
    }

    /// Run the named tool and return its result as JSON
    pub fn call(&self, name: &str, input: &serde_json::Value) -> Result<serde_json::Value> {
        tracing::debug!(tool = name, "Executing analysis tool");

        if name == GET_FINANCIAL_METRICS {
            let _: FinancialMetricsParams = parse_params(input)?;
            return Ok(serde_json::to_value(compute_metrics(&self.data, self.config))?);
        }

        let kind: AnalyzerKind = name.parse().map_err(|_| Error::UnknownTool(name.to_string()))?;

        let result = match kind {
            AnalyzerKind::MomTrend => {
                let params: MonthlyHistoryParams = parse_params(input)?;
                serde_json::to_value(self.engine.mom_trend(&self.history(params.months)))?
            }
            AnalyzerKind::IncomeStability => {
                let params: MonthlyHistoryParams = parse_params(input)?;
                serde_json::to_value(self.engine.income_stability(&self.history(params.months)))?
            }
            AnalyzerKind::SavingsTrajectory => {
                let params: MonthlyHistoryParams = parse_params(input)?;
                serde_json::to_value(self.engine.savings_trajectory(&self.history(params.months)))?
            }
            AnalyzerKind::SpendingComparison => {
                let params: SpendingComparisonParams = parse_params(input)?;
                let month = params
                    .month
                    .as_deref()
                    .map(ReportingMonth::parse)
                    .transpose()?;
                serde_json::to_value(
                    self.engine
                        .spending_comparison(&self.context, month.as_ref().map(|m| m.as_str())),
                )?
            }
            AnalyzerKind::PortfolioRisk => {
                let _: PortfolioRiskParams = parse_params(input)?;
                serde_json::to_value(self.engine.portfolio_risk(&self.context))?
            }
        };

        Ok(result)
    }

    fn history(&self, months: Option<usize>) -> AnalysisContext {
        match months {
            Some(months) => self.context.last_months(months),
            None => self.context.clone(),
        }
    }
}

/// Missing or null input means "all defaults"
fn parse_params<T: serde::de::DeserializeOwned + Default>(input: &serde_json::Value) -> Result<T> {
    if input.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(input.clone())
        .map_err(|e| Error::InvalidData(format!("Invalid params: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TransactionType};
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_data() -> CollectedData {
        let mut transactions = Vec::new();
        for (m, food) in [(1, 300), (2, 320), (3, 310), (4, 900)] {
            let date = |day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
            transactions.push(Transaction {
                date: date(25),
                category: None,
                amount: 4000,
                kind: TransactionType::Income,
            });
            transactions.push(Transaction {
                date: date(3),
                category: Some("Food".to_string()),
                amount: food,
                kind: TransactionType::Expense,
            });
        }
        CollectedData {
            total_assets: 20_000,
            liquid_assets: 5_000,
            transactions,
            ..Default::default()
        }
    }

    fn month() -> ReportingMonth {
        ReportingMonth::parse("2026-05").unwrap()
    }

    #[test]
    fn test_tool_count_and_names() {
        let tools = analysis_tools();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0].name, GET_FINANCIAL_METRICS);
        for kind in AnalyzerKind::ALL {
            assert!(tools.iter().any(|t| t.name == kind.as_str()), "{}", kind);
        }
    }

    #[test]
    fn test_tool_has_correct_schema() {
        let tools = analysis_tools();
        let tool = tools
            .iter()
            .find(|t| t.name == "spending_comparison")
            .unwrap();
        assert!(tool.description.contains("3- and 6-month"));
        assert!(tool.input_schema.is_object());
        assert!(tool.input_schema["properties"]["month"].is_object());
    }

    #[test]
    fn test_tool_serializes_camel_case() {
        let json = serde_json::to_value(&analysis_tools()[0]).unwrap();
        assert_eq!(json["name"], GET_FINANCIAL_METRICS);
        assert!(json["inputSchema"].is_object());
        assert!(json.get("input_schema").is_none());
    }

    #[test]
    fn test_unknown_tool() {
        let data = sample_data();
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let err = toolbox.call("forecast_expenses", &json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "forecast_expenses"));
    }

    #[test]
    fn test_invalid_params() {
        let data = sample_data();
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let err = toolbox.call("mom_trend", &json!({"months": "six"})).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let err = toolbox
            .call("spending_comparison", &json!({"month": "May"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_metrics_tool() {
        let data = sample_data();
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let result = toolbox.call(GET_FINANCIAL_METRICS, &serde_json::Value::Null).unwrap();
        assert!(result["healthScore"]["totalScore"].is_number());
    }

    #[test]
    fn test_metrics_tool_skips_current_month() {
        let mut data = sample_data();
        data.transactions.push(Transaction {
            date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            category: Some("Food".to_string()),
            amount: 10,
            kind: TransactionType::Expense,
        });
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let result = toolbox.call(GET_FINANCIAL_METRICS, &json!({})).unwrap();
        let savings = &toolbox.context().savings;
        assert_eq!(result["savings"]["monthlyExpenseAvg"], savings.monthly_expense_avg);
        assert_eq!(result["savings"]["emergencyFundMonths"], savings.emergency_fund_months);
        // (300 + 320 + 310 + 900) / 4, the May expense is ignored
        assert_eq!(savings.monthly_expense_avg, 458);
        assert_eq!(result["balance"]["trend"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_history_window() {
        let data = sample_data();
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let result = toolbox.call("mom_trend", &json!({"months": 2})).unwrap();
        assert_eq!(result["monthlyComparisons"].as_array().unwrap().len(), 2);

        let result = toolbox.call("income_stability", &json!({})).unwrap();
        assert_eq!(result["stability"], "very_stable");
    }

    #[test]
    fn test_spending_comparison_tool() {
        let data = sample_data();
        let config = AnalyticsConfig::default();
        let toolbox = AnalysisToolbox::new(&data, &config, &month());

        let latest = toolbox.call("spending_comparison", &json!({})).unwrap();
        assert_eq!(latest["anomalousCount"], 1);
        assert_eq!(latest["categories"][0]["severity"], "anomalous");

        let earlier = toolbox
            .call("spending_comparison", &json!({"month": "2026-02"}))
            .unwrap();
        assert_eq!(earlier["totalCurrentExpense"], 320);
        assert_eq!(earlier["totalPreviousMonthExpense"], 300);
    }
}
