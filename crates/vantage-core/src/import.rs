//! Snapshot and transaction import
//!
//! Snapshots are JSON documents shaped like [`CollectedData`]. Transactions
//! can also come from a plain `date,category,amount,type` CSV export.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CollectedData, Transaction, TransactionType};

const REQUIRED_COLUMNS: [&str; 4] = ["date", "category", "amount", "type"];

/// Read a JSON snapshot
pub fn parse_snapshot<R: Read>(reader: R) -> Result<CollectedData> {
    let data: CollectedData = serde_json::from_reader(reader)?;
    debug!(
        holdings = data.holdings.len(),
        transactions = data.transactions.len(),
        history = data.asset_history.len(),
        "Parsed snapshot"
    );
    Ok(data)
}

/// Read a JSON snapshot from disk
pub fn load_snapshot(path: &Path) -> Result<CollectedData> {
    let file = File::open(path)?;
    parse_snapshot(BufReader::new(file))
}

/// Parse `date,category,amount,type` rows
///
/// Columns are matched by header name in any order. A blank category is
/// `None`. Amounts are whole currency units; thousands separators and a
/// leading sign are ignored since the direction comes from `type`.
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = column_indexes(&headers)?;

    let mut transactions = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |name: usize| record.get(columns[name]).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d").map_err(|_| {
            Error::Import(format!("line {}: invalid date '{}', use YYYY-MM-DD", line, field(0)))
        })?;

        let category = Some(field(1))
            .filter(|c| !c.is_empty())
            .map(String::from);

        let amount = parse_amount(field(2))
            .ok_or_else(|| Error::Import(format!("line {}: invalid amount '{}'", line, field(2))))?;

        let kind: TransactionType = field(3)
            .parse()
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;

        transactions.push(Transaction {
            date,
            category,
            amount,
            kind,
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Read a transactions CSV from disk
pub fn load_transactions_csv(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    parse_transactions_csv(BufReader::new(file))
}

/// Position of each required column, in `REQUIRED_COLUMNS` order
fn column_indexes(headers: &StringRecord) -> Result<[usize; 4]> {
    let mut indexes = [0; 4];
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        indexes[slot] = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Import(format!("Missing '{}' column", name)))?;
    }
    Ok(indexes)
}

fn parse_amount(s: &str) -> Option<i64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(['-', '+'])
        .replace([',', ' ', '_'], "");
    cleaned.parse::<i64>().ok()
}
