//! Error types for Vantage
//!
//! The analytics functions themselves are total and never return these.
//! Errors only come from the edges: config files, snapshot/CSV import and
//! tool dispatch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown analysis tool: {0}")]
    UnknownTool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
