//! Configuration: import field mapping, category lexicon and budget groups
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path (`--config`), or the override in the data dir
//!    (~/.local/share/spendlens/config.toml) if it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Everything is validated once here; the rest of the crate trusts the typed
//! values it is handed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::categorize::{CategoryLexicon, LexiconEntry};
use crate::error::{Error, Result};
use crate::models::{BudgetGroup, FlowDirection};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Field mapping versions this build understands
pub const SUPPORTED_MAPPING_VERSION: u32 = 1;

/// The embedded default configuration as TOML text
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendlens").join("config.toml"))
}

/// Maps file columns / JSON keys to transaction fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub version: u32,
    pub date: String,
    pub amount: String,
    pub description: String,
    /// Column holding the income/expense token. When unset, or when a file
    /// lacks the column, the sign of the amount decides.
    pub flow: Option<String>,
    pub date_format: String,
    pub income_tokens: Vec<String>,
    pub expense_tokens: Vec<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            version: SUPPORTED_MAPPING_VERSION,
            date: "date".to_string(),
            amount: "amount".to_string(),
            description: "description".to_string(),
            flow: Some("type".to_string()),
            date_format: "%Y-%m-%d".to_string(),
            income_tokens: vec!["income".to_string()],
            expense_tokens: vec!["expense".to_string()],
        }
    }
}

impl FieldMapping {
    /// Check the mapping is usable
    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_MAPPING_VERSION {
            return Err(Error::Config(format!(
                "unsupported field mapping version {} (expected {})",
                self.version, SUPPORTED_MAPPING_VERSION
            )));
        }

        for (label, value) in [
            ("date", &self.date),
            ("amount", &self.amount),
            ("description", &self.description),
            ("date_format", &self.date_format),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("import.{} must not be empty", label)));
            }
        }

        if let Some(flow) = &self.flow {
            if flow.trim().is_empty() {
                return Err(Error::Config("import.flow must not be empty when set".into()));
            }
        }

        if self.income_tokens.is_empty() || self.expense_tokens.is_empty() {
            return Err(Error::Config(
                "import.income_tokens and import.expense_tokens must both be non-empty".into(),
            ));
        }

        let income: HashSet<String> = self
            .income_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        if let Some(shared) = self
            .expense_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .find(|t| income.contains(t))
        {
            return Err(Error::Config(format!(
                "token '{}' is listed as both income and expense",
                shared
            )));
        }

        Ok(())
    }

    /// Resolve a flow token from a file (case-insensitive)
    pub fn flow_for_token(&self, token: &str) -> Option<FlowDirection> {
        let token = token.trim().to_lowercase();
        if self
            .income_tokens
            .iter()
            .any(|t| t.trim().to_lowercase() == token)
        {
            Some(FlowDirection::Income)
        } else if self
            .expense_tokens
            .iter()
            .any(|t| t.trim().to_lowercase() == token)
        {
            Some(FlowDirection::Expense)
        } else {
            None
        }
    }
}

/// Category -> budget group membership table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetGroups {
    pub essentials: Vec<String>,
    pub discretionary: Vec<String>,
}

impl Default for BudgetGroups {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            essentials: owned(&["food", "transport", "health", "housing", "household"]),
            discretionary: owned(&["entertainment", "clothing", "education"]),
        }
    }
}

impl BudgetGroups {
    pub fn validate(&self) -> Result<()> {
        if let Some(both) = self
            .essentials
            .iter()
            .find(|c| self.discretionary.contains(c))
        {
            return Err(Error::Config(format!(
                "category '{}' is in both essentials and discretionary",
                both
            )));
        }
        Ok(())
    }

    /// Spending group of a category; None if it belongs to neither
    pub fn group_of(&self, category: &str) -> Option<BudgetGroup> {
        if self.essentials.iter().any(|c| c == category) {
            Some(BudgetGroup::Essentials)
        } else if self.discretionary.iter().any(|c| c == category) {
            Some(BudgetGroup::Discretionary)
        } else {
            None
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "embedded defaults"),
        }
    }
}

/// Fully validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub import: FieldMapping,
    pub lexicon: CategoryLexicon,
    pub budget: BudgetGroups,
    pub source: ConfigSource,
}

impl AppConfig {
    /// Load configuration (explicit path or override first, then default)
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Some(default_path) = default_config_path() {
            if default_path.exists() {
                return Self::from_file(&default_path);
            }
        }

        Self::embedded()
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = parse_config(&content)?;
        config.source = ConfigSource::File(path.to_path_buf());
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Parse TOML text (source reported as embedded)
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    import: Option<RawImport>,
    categories: Option<Vec<LexiconEntry>>,
    budget: Option<RawBudget>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    version: Option<u32>,
    date: Option<String>,
    amount: Option<String>,
    description: Option<String>,
    flow: Option<String>,
    date_format: Option<String>,
    income_tokens: Option<Vec<String>>,
    expense_tokens: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    essentials: Option<Vec<String>>,
    discretionary: Option<Vec<String>>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut import = FieldMapping::default();
    if let Some(section) = raw.import {
        if let Some(version) = section.version {
            import.version = version;
        }
        if let Some(date) = section.date {
            import.date = date;
        }
        if let Some(amount) = section.amount {
            import.amount = amount;
        }
        if let Some(description) = section.description {
            import.description = description;
        }
        // An explicit empty string turns the flow column off
        if let Some(flow) = section.flow {
            import.flow = if flow.is_empty() { None } else { Some(flow) };
        }
        if let Some(format) = section.date_format {
            import.date_format = format;
        }
        if let Some(tokens) = section.income_tokens {
            import.income_tokens = tokens;
        }
        if let Some(tokens) = section.expense_tokens {
            import.expense_tokens = tokens;
        }
    }
    import.validate()?;

    let entries = raw.categories.unwrap_or_default();
    if entries.is_empty() {
        warn!("No categories configured; every expense will be uncategorized");
    }
    let lexicon = CategoryLexicon::new(entries)?;

    let mut budget = BudgetGroups::default();
    if let Some(section) = raw.budget {
        if let Some(essentials) = section.essentials {
            budget.essentials = essentials;
        }
        if let Some(discretionary) = section.discretionary {
            budget.discretionary = discretionary;
        }
    }
    budget.validate()?;

    debug!(
        "Config: {} categories, {} essential, {} discretionary",
        lexicon.len(),
        budget.essentials.len(),
        budget.discretionary.len()
    );

    Ok(AppConfig {
        import,
        lexicon,
        budget,
        source: ConfigSource::Embedded,
    })
}
