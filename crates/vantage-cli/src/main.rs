//! Vantage CLI - Personal finance analytics
//!
//! Usage:
//!   vantage metrics --input snapshot.json         Metrics and health score
//!   vantage analyze --input snapshot.json         Trend and risk analyzers
//!   vantage summarize --csv transactions.csv      Monthly summaries
//!   vantage tools                                 Analysis tool definitions
//!
//! JSON goes to stdout, logs to stderr.

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Metrics { source, month } => {
            let data = commands::load_input(&source)?;
            let month = commands::reporting_month(month.as_deref())?;
            commands::cmd_metrics(&data, &config, &month, cli.compact)
        }
        Commands::Analyze {
            source,
            only,
            month,
        } => {
            let data = commands::load_input(&source)?;
            let month = commands::reporting_month(month.as_deref())?;
            commands::cmd_analyze(&data, &config, &only, &month, cli.compact)
        }
        Commands::Summarize { csv, categories } => {
            commands::cmd_summarize(&csv, categories, &config, cli.compact)
        }
        Commands::Tools => commands::cmd_tools(cli.compact),
        Commands::Call {
            name,
            source,
            params,
            month,
        } => {
            let data = commands::load_input(&source)?;
            let month = commands::reporting_month(month.as_deref())?;
            commands::cmd_call(&data, &config, &name, params.as_deref(), &month, cli.compact)
        }
        Commands::Report {
            source,
            reports,
            group,
            month,
        } => {
            let data = commands::load_input(&source)?;
            let month = commands::reporting_month(month.as_deref())?;
            commands::cmd_report(
                &data,
                &config,
                reports.as_deref(),
                &group,
                &month,
                cli.compact,
            )
        }
    }
}
