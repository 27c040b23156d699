//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::NaiveDate;
use spendlens_core::{AppConfig, ConfigSource, FlowDirection, Transaction};
use tempfile::NamedTempFile;

use crate::commands::{self, truncate};

const STATEMENT: &str = "date,amount,description,type
2024-01-10,50000.00,Salary,income
2024-01-15,-1500.50,Groceries at MarketChain,expense
2024-01-18,-20000.00,Rent payment,expense
2024-02-10,50000.00,Salary,income
2024-02-12,-900.00,Taxi home,expense
2024-02-14,-3000.00,Concert tickets,expense
2024-06-01,-700.00,Pharmacy,expense
";

fn config() -> AppConfig {
    AppConfig::embedded().unwrap()
}

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn tx(date: &str, amount: f64, flow: FlowDirection, category: &str) -> Transaction {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Transaction::new(date, amount, "test", flow, category)
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("groceries", 25), "groceries");
    assert_eq!(truncate("a very long category name indeed", 10), "a very ...");
    assert_eq!(truncate("продукты и напитки", 8), "проду...");
}

// ========== Config Command Tests ==========

#[test]
fn test_load_config_missing_explicit_path() {
    let result = commands::load_config(Some(std::path::Path::new("/nonexistent/spendlens.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_config_from_file() {
    let file = temp_file(
        ".toml",
        "[[categories]]\nname = \"coffee\"\nkeywords = [\"espresso\"]\n",
    );
    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.lexicon.len(), 1);
}

#[test]
fn test_config_text_embedded() {
    let text = commands::config_text(&config()).unwrap();
    assert!(text.contains("[[categories]]"));
    assert!(text.contains("[budget]"));
}

#[test]
fn test_config_text_from_file() {
    let content = "[[categories]]\nname = \"coffee\"\nkeywords = [\"espresso\"]\n";
    let file = temp_file(".toml", content);
    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(commands::config_text(&config).unwrap(), content);
}

#[test]
fn test_cmd_config() {
    assert!(commands::cmd_config(&config(), false).is_ok());
    assert!(commands::cmd_config(&config(), true).is_ok());
}

// ========== Categorize Command Tests ==========

#[test]
fn test_cmd_categorize() {
    assert!(commands::cmd_categorize(&config(), "Groceries at MarketChain", false).is_ok());
    assert!(commands::cmd_categorize(&config(), "Night taxi", true).is_ok());
    assert!(commands::cmd_categorize(&config(), "", false).is_ok());
}

// ========== Report Command Tests ==========

#[test]
fn test_load_transactions() {
    let file = temp_file(".csv", STATEMENT);
    let txs = commands::load_transactions(&config(), file.path()).unwrap();
    assert_eq!(txs.len(), 7);
    assert_eq!(txs[1].category, "food");
    assert_eq!(txs[2].category, "housing");
    assert_eq!(txs[3].category, "transport");
    assert_eq!(txs[4].category, "entertainment");
}

#[test]
fn test_load_transactions_unsupported_extension() {
    let file = temp_file(".xlsx", STATEMENT);
    assert!(commands::load_transactions(&config(), file.path()).is_err());
}

#[test]
fn test_build_summary() {
    let file = temp_file(".csv", STATEMENT);
    let txs = commands::load_transactions(&config(), file.path()).unwrap();
    let report = commands::build_summary(&txs).unwrap();

    assert_eq!(report.stats.transaction_count, 7);
    assert!((report.stats.total_income - 100000.0).abs() < 0.01);
    assert!((report.stats.total_expenses - 26100.50).abs() < 0.01);
    assert_eq!(report.categories[0].category, "food");
}

#[test]
fn test_build_summary_without_expenses() {
    let txs = vec![tx("2024-01-10", 100.0, FlowDirection::Income, "income")];
    let report = commands::build_summary(&txs).unwrap();
    assert!(report.categories.is_empty());
    assert_eq!(report.stats.balance, 100.0);
}

#[test]
fn test_build_full_report() {
    let file = temp_file(".csv", STATEMENT);
    let config = config();
    let txs = commands::load_transactions(&config, file.path()).unwrap();
    let report = commands::build_full_report(&txs, &config.budget).unwrap();

    assert_eq!(report.months.len(), 3);
    assert_eq!(report.history.months_analyzed, 3);
    assert_eq!(report.history.biggest_expenses[0].category, "housing");
    assert_eq!(
        report.budget.compliance.out_of_range,
        !report.budget.compliance.violations.is_empty()
    );

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["history"]["seasonal_high"]["season"].is_string());
    assert!(json["budget"]["compliance"]["shares"]["savings"].is_i64());
}

#[test]
fn test_build_budget_zero_total_fails() {
    // Income exactly covers an ungrouped expense: every bucket is zero
    let txs = vec![
        tx("2024-01-10", 10.0, FlowDirection::Income, "income"),
        tx("2024-01-11", 10.0, FlowDirection::Expense, "transfers"),
    ];
    let config = config();
    let months = spendlens_core::monthly_breakdown(&txs);
    let analysis = spendlens_core::analyze_history(&txs).unwrap();
    assert!(commands::build_budget(&months, &analysis, &config.budget).is_err());
}

#[test]
fn test_build_budget_rounding_residue_fails() {
    // 0.3 income against 0.1 + 0.2 of transfers leaves float residue, not savings
    let txs = vec![
        tx("2024-01-10", 0.3, FlowDirection::Income, "income"),
        tx("2024-01-11", 0.1, FlowDirection::Expense, "transfers"),
        tx("2024-01-12", 0.2, FlowDirection::Expense, "transfers"),
    ];
    let config = config();
    let months = spendlens_core::monthly_breakdown(&txs);
    let analysis = spendlens_core::analyze_history(&txs).unwrap();
    assert!(commands::build_budget(&months, &analysis, &config.budget).is_err());
}

#[test]
fn test_build_budget_negative_total_fails() {
    let txs = vec![
        tx("2024-01-10", 1000.0, FlowDirection::Income, "income"),
        tx("2024-01-11", 500.0, FlowDirection::Expense, "food"),
        tx("2024-01-12", 2000.0, FlowDirection::Expense, "transfers"),
    ];
    let config = config();
    let months = spendlens_core::monthly_breakdown(&txs);
    let analysis = spendlens_core::analyze_history(&txs).unwrap();
    assert!(commands::build_budget(&months, &analysis, &config.budget).is_err());
}

#[test]
fn test_report_commands_run() {
    let file = temp_file(".csv", STATEMENT);
    let config = config();
    for json in [false, true] {
        assert!(commands::cmd_summary(&config, file.path(), json).is_ok());
        assert!(commands::cmd_months(&config, file.path(), json).is_ok());
        assert!(commands::cmd_history(&config, file.path(), json).is_ok());
        assert!(commands::cmd_budget(&config, file.path(), json).is_ok());
        assert!(commands::cmd_report(&config, file.path(), json).is_ok());
    }
}

#[test]
fn test_report_commands_on_json_file() {
    let json = r#"[
        {"date": "2024-03-01", "amount": 2500, "description": "Salary", "type": "income"},
        {"date": "2024-03-02", "amount": -120.5, "description": "Bakery", "type": "expense"},
        {"date": "2024-03-03", "amount": -80, "description": "Bus ticket", "type": "expense"}
    ]"#;
    let file = temp_file(".json", json);
    assert!(commands::cmd_report(&config(), file.path(), false).is_ok());
}

#[test]
fn test_history_on_empty_file_fails() {
    let file = temp_file(".csv", "date,amount,description,type\n");
    assert!(commands::cmd_history(&config(), file.path(), false).is_err());
    // Summary of nothing is all zeros, not an error
    assert!(commands::cmd_summary(&config(), file.path(), false).is_ok());
}

#[test]
fn test_malformed_file_fails() {
    let file = temp_file(".csv", "date,amount,description,type\nnot-a-date,-5,Coffee,expense\n");
    assert!(commands::cmd_summary(&config(), file.path(), false).is_err());
}
