//! Totals, per-category breakdown and per-month breakdown
//!
//! All reducers are read-only over a categorized transaction list. Category
//! order in every output is the order in which a category first appears in
//! the input.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{BasicStats, CategoryStats, CategoryTotal, MonthStats, Transaction};

/// Totals smaller than half a cent count as zero
pub(crate) const ZERO_TOLERANCE: f64 = 0.005;

/// Whether an accumulated amount is zero up to float rounding
pub(crate) fn is_negligible(amount: f64) -> bool {
    amount.abs() < ZERO_TOLERANCE
}

/// Round to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-category amount and count, kept in first-appearance order
#[derive(Debug, Default)]
pub(crate) struct CategoryAccumulator {
    order: Vec<(String, f64, usize)>,
    index: HashMap<String, usize>,
}

impl CategoryAccumulator {
    pub(crate) fn add(&mut self, category: &str, amount: f64) {
        match self.index.get(category) {
            Some(&i) => {
                self.order[i].1 += amount;
                self.order[i].2 += 1;
            }
            None => {
                self.index.insert(category.to_string(), self.order.len());
                self.order.push((category.to_string(), amount, 1));
            }
        }
    }

    /// (category, amount, count) in first-appearance order
    pub(crate) fn into_entries(self) -> Vec<(String, f64, usize)> {
        self.order
    }

    pub(crate) fn into_totals(self) -> Vec<CategoryTotal> {
        self.order
            .into_iter()
            .map(|(category, amount, _)| CategoryTotal { category, amount })
            .collect()
    }
}

fn sum_flows<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> BasicStats {
    let mut stats = BasicStats::default();
    for tx in transactions {
        if tx.is_income() {
            stats.total_income += tx.amount;
        } else {
            stats.total_expenses += tx.amount;
        }
        stats.transaction_count += 1;
    }
    stats.balance = stats.total_income - stats.total_expenses;
    stats
}

/// Total income, total expenses, balance and count.
///
/// An empty list gives all zeros.
pub fn basic_stats(transactions: &[Transaction]) -> BasicStats {
    sum_flows(transactions)
}

/// Like [`basic_stats`], but an empty list is an error
pub fn basic_stats_non_empty(transactions: &[Transaction]) -> Result<BasicStats> {
    if transactions.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(basic_stats(transactions))
}

/// Expense totals per category with their share of all expenses
pub fn category_breakdown(transactions: &[Transaction]) -> Result<Vec<CategoryStats>> {
    let mut acc = CategoryAccumulator::default();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        acc.add(&tx.category, tx.amount);
    }

    let total_expenses: f64 = acc.order.iter().map(|(_, amount, _)| amount).sum();
    if is_negligible(total_expenses) {
        return Err(Error::DivisionByZero("total expenses are zero"));
    }

    let breakdown: Vec<CategoryStats> = acc
        .into_entries()
        .into_iter()
        .map(|(category, amount, transaction_count)| CategoryStats {
            category,
            amount,
            transaction_count,
            percentage: round2(amount / total_expenses * 100.0),
        })
        .collect();

    debug!(
        "Category breakdown: {} categories, {:.2} total",
        breakdown.len(),
        total_expenses
    );
    Ok(breakdown)
}

/// Bucket transactions by month number (1-12), keeping input order within
/// each month. Transactions from different years in the same month share a
/// bucket.
pub fn group_by_month(transactions: &[Transaction]) -> BTreeMap<u32, Vec<&Transaction>> {
    let mut buckets: BTreeMap<u32, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        buckets.entry(tx.date.month()).or_default().push(tx);
    }
    buckets
}

/// Income, expenses and most frequent categories per month, ascending by month
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthStats> {
    group_by_month(transactions)
        .into_iter()
        .map(|(month, bucket)| {
            let totals = sum_flows(bucket.iter().copied());

            let mut counts = CategoryAccumulator::default();
            for tx in &bucket {
                counts.add(&tx.category, 0.0);
            }
            let entries = counts.into_entries();
            let max = entries.iter().map(|(_, _, count)| *count).max().unwrap_or(0);
            let popular_categories = entries
                .into_iter()
                .filter(|(_, _, count)| *count == max)
                .map(|(category, _, _)| category)
                .collect();

            MonthStats {
                month,
                income: totals.total_income,
                expenses: totals.total_expenses,
                popular_categories,
            }
        })
        .collect()
}
