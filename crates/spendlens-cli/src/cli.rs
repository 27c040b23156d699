//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendlens - See where your money goes
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Offline personal spending analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config, then built-in defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income, expenses, balance and spending per category
    Summary {
        /// Transaction file (.csv or .json)
        file: PathBuf,
    },

    /// Income, expenses and most frequent categories per month
    Months {
        /// Transaction file (.csv or .json)
        file: PathBuf,
    },

    /// Averages, seasonal patterns, biggest categories and a suggested cut
    History {
        /// Transaction file (.csv or .json)
        file: PathBuf,
    },

    /// Essentials / discretionary / savings split against target ranges
    Budget {
        /// Transaction file (.csv or .json)
        file: PathBuf,
    },

    /// Run every analysis in order
    Report {
        /// Transaction file (.csv or .json)
        file: PathBuf,
    },

    /// Show which category a description falls into
    Categorize {
        /// Transaction description
        description: String,
    },

    /// Show the active configuration
    Config {
        /// Print the full TOML instead of a summary
        #[arg(long)]
        dump: bool,
    },
}
