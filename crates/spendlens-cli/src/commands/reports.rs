//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use spendlens_core::budget::target_band;
use spendlens_core::{
    analyze_history, basic_stats, category_breakdown, check_budget_compliance,
    create_budget_allocation, monthly_breakdown, AppConfig, BasicStats, BudgetAllocation,
    BudgetGroup, BudgetGroups, CategoryStats, ComplianceReport, Error, HistoricalAnalysis,
    MonthStats, Transaction,
};

use super::{load_transactions, print_json, truncate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Totals plus per-category breakdown
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub stats: BasicStats,
    pub categories: Vec<CategoryStats>,
}

/// Allocation and its compliance check
#[derive(Debug, Serialize)]
pub struct BudgetReport {
    pub allocation: BudgetAllocation,
    pub compliance: ComplianceReport,
}

/// Every stage of the pipeline, in order
#[derive(Debug, Serialize)]
pub struct FullReport {
    pub summary: SummaryReport,
    pub months: Vec<MonthStats>,
    pub history: HistoricalAnalysis,
    pub budget: BudgetReport,
}

/// Totals and category breakdown. No expenses at all gives an empty breakdown.
pub fn build_summary(transactions: &[Transaction]) -> Result<SummaryReport> {
    let stats = basic_stats(transactions);
    let categories = match category_breakdown(transactions) {
        Ok(categories) => categories,
        Err(Error::DivisionByZero(_)) => Vec::new(),
        Err(e) => return Err(e).context("Failed to build category breakdown"),
    };
    Ok(SummaryReport { stats, categories })
}

pub fn build_budget(
    months: &[MonthStats],
    analysis: &HistoricalAnalysis,
    groups: &BudgetGroups,
) -> Result<BudgetReport> {
    let allocation = create_budget_allocation(months, analysis, groups);
    let compliance =
        check_budget_compliance(&allocation).context("Cannot compute budget shares")?;
    Ok(BudgetReport {
        allocation,
        compliance,
    })
}

pub fn build_full_report(transactions: &[Transaction], groups: &BudgetGroups) -> Result<FullReport> {
    let summary = build_summary(transactions)?;
    let months = monthly_breakdown(transactions);
    let history = analyze_history(transactions).context("Historical analysis failed")?;
    let budget = build_budget(&months, &history, groups)?;
    Ok(FullReport {
        summary,
        months,
        history,
        budget,
    })
}

pub fn cmd_summary(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let transactions = load_transactions(config, file)?;
    let report = build_summary(&transactions)?;

    if json {
        return print_json(&report);
    }
    print_summary(&report);
    Ok(())
}

pub fn cmd_months(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let transactions = load_transactions(config, file)?;
    let months = monthly_breakdown(&transactions);

    if json {
        return print_json(&months);
    }
    print_months(&months);
    Ok(())
}

pub fn cmd_history(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let transactions = load_transactions(config, file)?;
    let analysis = analyze_history(&transactions).context("Historical analysis failed")?;

    if json {
        return print_json(&analysis);
    }
    print_history(&analysis);
    Ok(())
}

pub fn cmd_budget(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let transactions = load_transactions(config, file)?;
    let months = monthly_breakdown(&transactions);
    let analysis = analyze_history(&transactions).context("Historical analysis failed")?;
    let report = build_budget(&months, &analysis, &config.budget)?;

    if json {
        return print_json(&report);
    }
    print_budget(&report);
    Ok(())
}

pub fn cmd_report(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let transactions = load_transactions(config, file)?;
    let report = build_full_report(&transactions, &config.budget)?;

    if json {
        return print_json(&report);
    }
    print_summary(&report.summary);
    print_months(&report.months);
    print_history(&report.history);
    print_budget(&report.budget);
    Ok(())
}

fn print_summary(report: &SummaryReport) {
    let stats = &report.stats;

    println!();
    println!("📊 Spending Summary");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Transactions: {}", stats.transaction_count);
    println!("   Income:       {:>12.2}", stats.total_income);
    println!("   Expenses:     {:>12.2}", stats.total_expenses);
    println!("   Balance:      {:>12.2}", stats.balance);
    println!();

    if report.categories.is_empty() {
        println!("   No expenses found.");
        return;
    }

    println!(
        "   {:25} │ {:>12} │ {:>7} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼──────────────┼─────────┼───────");
    for cat in &report.categories {
        println!(
            "   {:25} │ {:>12.2} │ {:>6.2}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.transaction_count
        );
    }
}

fn print_months(months: &[MonthStats]) {
    println!();
    println!("📅 Monthly Breakdown");
    println!("   ─────────────────────────────────────────────────────────────");

    if months.is_empty() {
        println!("   No transactions found.");
        return;
    }

    println!(
        "   {:10} │ {:>12} │ {:>12} │ Most frequent",
        "Month", "Income", "Expenses"
    );
    println!("   ───────────┼──────────────┼──────────────┼──────────────────");
    for month in months {
        println!(
            "   {:10} │ {:>12.2} │ {:>12.2} │ {}",
            month_name(month.month),
            month.income,
            month.expenses,
            month.popular_categories.join(", ")
        );
    }
}

fn print_history(analysis: &HistoricalAnalysis) {
    println!();
    println!("📈 Spending History ({} months)", analysis.months_analyzed);
    println!("   ─────────────────────────────────────────────────────────────");

    if !analysis.average_costs.is_empty() {
        println!("   {:25} │ {:>12}", "Category", "Avg / month");
        println!("   ──────────────────────────┼──────────────");
        for avg in &analysis.average_costs {
            println!(
                "   {:25} │ {:>12.2}",
                truncate(&avg.category, 25),
                avg.average
            );
        }
        println!();
    }

    println!(
        "   Highest season: {} ({:.2})",
        analysis.seasonal_high.season, analysis.seasonal_high.amount
    );
    println!(
        "   Lowest season:  {} ({:.2})",
        analysis.seasonal_low.season, analysis.seasonal_low.amount
    );

    if !analysis.biggest_expenses.is_empty() {
        println!();
        println!("   Biggest expenses:");
        for (rank, cat) in analysis.biggest_expenses.iter().enumerate() {
            println!("     {}. {} ({:.2})", rank + 1, cat.category, cat.amount);
        }
    }

    println!();
    match &analysis.recommendation {
        Some(rec) => println!(
            "   💡 Cut {} by {:.2}% to bring it in line with {}",
            rec.category, rec.reduction_percent, rec.reference_category
        ),
        None => println!("   💡 No recommendation available"),
    }

    for gap in &analysis.gaps {
        println!("   \x1b[2m⚠️  {}\x1b[0m", gap);
    }
}

fn print_budget(report: &BudgetReport) {
    println!();
    println!("💰 Budget Allocation");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:15} │ {:>12} │ {:>6} │ {:>9}",
        "Group", "Amount", "Share", "Target"
    );
    println!("   ────────────────┼──────────────┼────────┼───────────");

    for group in [
        BudgetGroup::Essentials,
        BudgetGroup::Discretionary,
        BudgetGroup::Savings,
    ] {
        let band = target_band(group);
        let marker = if report.compliance.violations.contains(&group) {
            " ✗"
        } else {
            " ✓"
        };
        println!(
            "   {:15} │ {:>12.2} │ {:>5}% │ {:>3}-{:<3}%{}",
            group.as_str(),
            report.allocation.get(group),
            report.compliance.shares.get(group),
            band.start(),
            band.end(),
            marker
        );
    }

    println!();
    if report.compliance.out_of_range {
        println!("   ⚠️  Budget is outside the recommended ranges");
    } else {
        println!("   ✅ Budget is within the recommended ranges");
    }
}
