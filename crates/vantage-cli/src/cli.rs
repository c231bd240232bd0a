//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Vantage - Personal finance analytics
#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "Metrics, health score and trend analysis for personal finances", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the engine's input comes from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Snapshot JSON (totals, holdings, transactions, asset history)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Transactions CSV appended to the snapshot's transactions
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the full metrics set and health score
    Metrics {
        #[command(flatten)]
        source: InputArgs,

        /// Current (in-progress) month to exclude, YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Run the trend and risk analyzers
    Analyze {
        #[command(flatten)]
        source: InputArgs,

        /// Analyzers to run, comma separated (default: all)
        /// mom_trend, income_stability, savings_trajectory, spending_comparison, portfolio_risk
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Current (in-progress) month to exclude, YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Summarize a transactions CSV by month
    Summarize {
        /// Transactions CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Emit per-category totals instead of monthly summaries
        #[arg(long)]
        categories: bool,
    },

    /// List the analysis tool definitions
    Tools,

    /// Invoke one analysis tool by name
    Call {
        /// Tool name (see `vantage tools`)
        name: String,

        #[command(flatten)]
        source: InputArgs,

        /// Tool parameters as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// Current (in-progress) month to exclude, YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Current metrics joined with the newest stored narrative report
    Report {
        #[command(flatten)]
        source: InputArgs,

        /// Stored reports (JSON array)
        #[arg(long)]
        reports: Option<PathBuf>,

        /// Group whose newest report is used
        #[arg(long, default_value = "default")]
        group: String,

        /// Current (in-progress) month to exclude, YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },
}
