//! Lexicon lookup and configuration commands

use anyhow::{Context, Result};
use serde::Serialize;
use spendlens_core::config::default_config_toml;
use spendlens_core::{categorize, AppConfig, ConfigSource};

#[derive(Debug, Serialize)]
struct CategorizeOutput<'a> {
    description: &'a str,
    category: &'a str,
}

pub fn cmd_categorize(config: &AppConfig, description: &str, json: bool) -> Result<()> {
    let category = categorize(description, &config.lexicon);

    if json {
        return super::print_json(&CategorizeOutput {
            description,
            category,
        });
    }

    println!("{} → {}", description, category);
    Ok(())
}

/// The TOML text behind the active configuration
pub fn config_text(config: &AppConfig) -> Result<String> {
    match &config.source {
        ConfigSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        ConfigSource::Embedded => Ok(default_config_toml().to_string()),
    }
}

pub fn cmd_config(config: &AppConfig, dump: bool) -> Result<()> {
    if dump {
        print!("{}", config_text(config)?);
        return Ok(());
    }

    println!();
    println!("⚙️  Configuration");
    println!("   Source: {}", config.source);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Import: date='{}' amount='{}' description='{}' flow={} ({})",
        config.import.date,
        config.import.amount,
        config.import.description,
        config
            .import
            .flow
            .as_deref()
            .map(|f| format!("'{}'", f))
            .unwrap_or_else(|| "sign of amount".to_string()),
        config.import.date_format
    );
    println!();

    println!("   Categories (first match wins):");
    for entry in config.lexicon.entries() {
        println!("     {:15} {} keywords", entry.name, entry.keywords.len());
    }
    println!();

    println!("   Essentials:    {}", config.budget.essentials.join(", "));
    println!("   Discretionary: {}", config.budget.discretionary.join(", "));
    Ok(())
}
