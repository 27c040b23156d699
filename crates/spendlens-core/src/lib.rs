//! Spendlens Core Library
//!
//! Offline personal spending analysis:
//! - CSV and JSON transaction import with configurable field mapping
//! - Keyword categorization against an ordered category lexicon
//! - Totals, category and monthly breakdowns
//! - Historical analysis (averages, seasons, top categories, recommendation)
//! - Budget allocation and compliance against target bands

pub mod budget;
pub mod categorize;
pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod models;
pub mod stats;

pub use budget::{
    check_budget_compliance, create_budget_allocation, DISCRETIONARY_BAND, ESSENTIALS_BAND,
    SAVINGS_BAND,
};
pub use categorize::{categorize, categorize_all, CategoryLexicon, LexiconEntry};
pub use config::{AppConfig, BudgetGroups, ConfigSource, FieldMapping};
pub use error::{Error, Result};
pub use history::analyze_history;
pub use import::{import_file, ImportFormat};
pub use models::*;
pub use stats::{basic_stats, basic_stats_non_empty, category_breakdown, monthly_breakdown};
