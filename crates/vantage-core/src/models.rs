//! Data models for Vantage
//!
//! Input records (`CollectedData` and its parts) come from the data-access
//! layer already scoped to one reporting group and a 12-month lookback.
//! `MonthlySummary` and `CategoryTotal` are the derived series consumed by
//! the trend and risk analyzers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// An account holding (asset or liability) with its latest value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub name: String,
    /// Asset category name (e.g. "Stocks"); None when the source has none
    pub category_name: Option<String>,
    pub amount: i64,
    pub unrealized_gain: Option<i64>,
    pub unrealized_gain_pct: Option<f64>,
    #[serde(default)]
    pub is_liability: bool,
    #[serde(default)]
    pub liability_category: Option<String>,
    /// Day-over-day value change, when the source reports one
    #[serde(default)]
    pub daily_change: Option<i64>,
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: NaiveDate,
    pub category: Option<String>,
    /// Magnitude in the smallest currency unit; direction lives in `kind`
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// `YYYY-MM` key of the transaction date
    pub fn month(&self) -> String {
        month_key(self.date)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Daily total-assets snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub date: NaiveDate,
    pub total_assets: i64,
    pub change: i64,
}

/// Engine input: one reporting group's materialized records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedData {
    pub total_assets: i64,
    pub liquid_assets: i64,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub asset_history: Vec<Snapshot>,
}

impl CollectedData {
    /// Holdings that are assets (not liabilities)
    pub fn assets(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter().filter(|h| !h.is_liability)
    }

    /// Holdings flagged as liabilities
    pub fn liabilities(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter().filter(|h| h.is_liability)
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }

    /// False when there is nothing at all to report on
    pub fn has_any_data(&self) -> bool {
        self.total_assets != 0
            || !self.holdings.is_empty()
            || !self.transactions.is_empty()
            || !self.asset_history.is_empty()
    }

    /// Copy of this snapshot with one month's transactions removed
    pub fn without_month(&self, month: &ReportingMonth) -> Self {
        let mut data = self.clone();
        data.transactions.retain(|t| t.month() != month.as_str());
        data
    }
}

/// Income/expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: String,
    pub total_income: i64,
    pub total_expense: i64,
    pub net_income: i64,
}

impl MonthlySummary {
    pub fn new(month: impl Into<String>, total_income: i64, total_expense: i64) -> Self {
        Self {
            month: month.into(),
            total_income,
            total_expense,
            net_income: total_income - total_expense,
        }
    }
}

/// Per-month, per-category total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub month: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total_amount: i64,
}

/// Records keyed by a `YYYY-MM` month
pub trait MonthKeyed {
    fn month(&self) -> &str;
}

impl MonthKeyed for MonthlySummary {
    fn month(&self) -> &str {
        &self.month
    }
}

impl MonthKeyed for CategoryTotal {
    fn month(&self) -> &str {
        &self.month
    }
}

/// A validated `YYYY-MM` month, used as the injected "current month"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportingMonth(String);

impl ReportingMonth {
    /// Parse a `YYYY-MM` string
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .ok()
            .filter(|_| s.len() == 7)
            .map(|d| Self(month_key(d)))
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}. Use YYYY-MM", s)))
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(month_key(date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-padded `YYYY-MM` key for a date
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Number of distinct months among the given transactions
pub fn distinct_months<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> usize {
    transactions
        .into_iter()
        .map(Transaction::month)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Drop every record belonging to `month`
pub fn exclude_month<T: MonthKeyed>(items: Vec<T>, month: &ReportingMonth) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.month() != month.as_str())
        .collect()
}

/// Group transactions into chronologically sorted monthly summaries
pub fn monthly_summaries(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut by_month: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for t in transactions {
        let entry = by_month.entry(t.month()).or_insert((0, 0));
        match t.kind {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }

    by_month
        .into_iter()
        .map(|(month, (income, expense))| MonthlySummary::new(month, income, expense))
        .collect()
}

/// Group transactions into per-month, per-category totals
///
/// Transactions without a category are grouped under `uncategorized`.
/// Output is sorted by month, then category, then type.
pub fn category_totals(transactions: &[Transaction], uncategorized: &str) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<(String, String, TransactionType), i64> = BTreeMap::new();
    for t in transactions {
        let category = t.category.as_deref().unwrap_or(uncategorized).to_string();
        *totals.entry((t.month(), category, t.kind)).or_insert(0) += t.amount;
    }

    totals
        .into_iter()
        .map(|((month, category, kind), total_amount)| CategoryTotal {
            month,
            category,
            kind,
            total_amount,
        })
        .collect()
}

/// Category → amount mapping that keeps first-insertion order
///
/// Serializes as a JSON object whose keys appear in insertion order, so
/// output never depends on hash order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    entries: Vec<(String, i64)>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `category`, inserting it at the end if new
    pub fn add(&mut self, category: &str, amount: i64) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    pub fn get(&self, category: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(c, a)| (c.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, a)| a).sum()
    }

    /// New map with every amount passed through `f`, order preserved
    pub fn map_amounts(&self, f: impl Fn(i64) -> i64) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(c, a)| (c.clone(), f(*a)))
                .collect(),
        }
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CategoryMapVisitor;

        impl<'de> Visitor<'de> for CategoryMapVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to amounts")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = CategoryMap::new();
                while let Some((category, amount)) = access.next_entry::<String, i64>()? {
                    map.add(&category, amount);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(CategoryMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, category: Option<&str>, amount: i64, kind: TransactionType) -> Transaction {
        Transaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: category.map(String::from),
            amount,
            kind,
        }
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!(
            TransactionType::from_str("Expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }

    #[test]
    fn test_reporting_month_parse() {
        assert_eq!(ReportingMonth::parse("2026-03").unwrap().as_str(), "2026-03");
        assert!(ReportingMonth::parse("2026-3").is_err());
        assert!(ReportingMonth::parse("2026-13").is_err());
        assert!(ReportingMonth::parse("March").is_err());
    }

    #[test]
    fn test_reporting_month_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(ReportingMonth::from_date(date).as_str(), "2026-01");
    }

    #[test]
    fn test_monthly_summaries_sorted_with_net() {
        let txs = vec![
            tx("2026-02-03", Some("Food"), 300, TransactionType::Expense),
            tx("2026-01-25", None, 1000, TransactionType::Income),
            tx("2026-01-10", Some("Rent"), 400, TransactionType::Expense),
            tx("2026-02-25", None, 900, TransactionType::Income),
        ];

        let summaries = monthly_summaries(&txs);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0], MonthlySummary::new("2026-01", 1000, 400));
        assert_eq!(summaries[1].month, "2026-02");
        assert_eq!(summaries[1].net_income, 600);
    }

    #[test]
    fn test_category_totals_uses_uncategorized_bucket() {
        let txs = vec![
            tx("2026-01-03", None, 50, TransactionType::Expense),
            tx("2026-01-04", None, 25, TransactionType::Expense),
            tx("2026-01-05", Some("Food"), 10, TransactionType::Expense),
        ];

        let totals = category_totals(&txs, "Uncategorized");
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[1].category, "Uncategorized");
        assert_eq!(totals[1].total_amount, 75);
    }

    #[test]
    fn test_exclude_month() {
        let summaries = vec![
            MonthlySummary::new("2026-01", 1, 1),
            MonthlySummary::new("2026-02", 1, 1),
        ];
        let month = ReportingMonth::parse("2026-02").unwrap();
        let kept = exclude_month(summaries, &month);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].month, "2026-01");
    }

    #[test]
    fn test_has_any_data() {
        assert!(!CollectedData::default().has_any_data());
        let data = CollectedData {
            total_assets: 10,
            ..Default::default()
        };
        assert!(data.has_any_data());
    }

    #[test]
    fn test_category_map_keeps_insertion_order() {
        let mut map = CategoryMap::new();
        map.add("Zoo", 1);
        map.add("Apple", 2);
        map.add("Zoo", 3);

        let keys: Vec<&str> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, vec!["Zoo", "Apple"]);
        assert_eq!(map.get("Zoo"), Some(4));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Zoo":4,"Apple":2}"#);
    }

    #[test]
    fn test_collected_data_from_json() {
        let json = r#"{
            "totalAssets": 1000,
            "liquidAssets": 400,
            "holdings": [
                {"name": "Index Fund", "categoryName": "Investment trusts", "amount": 600,
                 "unrealizedGain": 100, "unrealizedGainPct": 20.0}
            ],
            "transactions": [
                {"date": "2026-01-05", "category": null, "amount": 120, "type": "expense"}
            ]
        }"#;

        let data: CollectedData = serde_json::from_str(json).unwrap();
        assert_eq!(data.holdings.len(), 1);
        assert!(!data.holdings[0].is_liability);
        assert_eq!(data.transactions[0].month(), "2026-01");
        assert!(data.asset_history.is_empty());
    }
}
