//! Spendlens CLI - Offline personal spending analyzer
//!
//! Usage:
//!   spendlens summary statement.csv     Totals and category breakdown
//!   spendlens history statement.csv     Seasonal patterns and recommendation
//!   spendlens budget statement.csv      Budget split vs. target ranges
//!   spendlens report statement.csv      Everything above

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
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { file } => commands::cmd_summary(&config, &file, cli.json),
        Commands::Months { file } => commands::cmd_months(&config, &file, cli.json),
        Commands::History { file } => commands::cmd_history(&config, &file, cli.json),
        Commands::Budget { file } => commands::cmd_budget(&config, &file, cli.json),
        Commands::Report { file } => commands::cmd_report(&config, &file, cli.json),
        Commands::Categorize { description } => {
            commands::cmd_categorize(&config, &description, cli.json)
        }
        Commands::Config { dump } => commands::cmd_config(&config, dump),
    }
}
