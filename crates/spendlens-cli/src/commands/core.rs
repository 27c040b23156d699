//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve and load the configuration
//! - `load_transactions` - Import and categorize a transaction file
//! - `print_json` - Pretty JSON output for `--json`

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use spendlens_core::{categorize_all, import_file, AppConfig, Transaction};
use tracing::{debug, info};

/// Load the configuration from `--config`, the user config, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load(path).context("Failed to load configuration")?;
    debug!("Using config: {}", config.source);
    Ok(config)
}

/// Import a transaction file and categorize every record
pub fn load_transactions(config: &AppConfig, file: &Path) -> Result<Vec<Transaction>> {
    let raw = import_file(file, &config.import)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    let transactions = categorize_all(&raw, &config.lexicon);
    info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        file.display()
    );
    Ok(transactions)
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
