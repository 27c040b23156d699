//! Domain models for spendlens

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category assigned when no lexicon keyword matches an expense
pub const UNCATEGORIZED: &str = "uncategorized";

/// Category assigned to every income transaction
pub const INCOME_CATEGORY: &str = "income";

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Income,
    Expense,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Infer direction from the sign of a signed amount
    pub fn from_signed_amount(amount: f64) -> Self {
        if amount < 0.0 {
            Self::Expense
        } else {
            Self::Income
        }
    }
}

impl std::str::FromStr for FlowDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown flow direction: {}", s)),
        }
    }
}

impl std::fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as read from a file, before categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: NaiveDate,
    /// Signed amount as found in the file
    pub amount: f64,
    pub description: String,
    pub flow: FlowDirection,
}

/// A categorized transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Non-negative magnitude; direction lives in `flow`
    pub amount: f64,
    pub description: String,
    pub flow: FlowDirection,
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        description: impl Into<String>,
        flow: FlowDirection,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount: amount.abs(),
            description: description.into(),
            flow,
            category: category.into(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.flow == FlowDirection::Expense
    }

    pub fn is_income(&self) -> bool {
        self.flow == FlowDirection::Income
    }
}

// ========== Aggregate Models ==========

/// Totals over a whole transaction list
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

/// Expense totals for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub amount: f64,
    pub transaction_count: usize,
    /// Share of total expenses, 0-100, rounded to 2 decimals
    pub percentage: f64,
}

/// Income, expenses and most frequent categories for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    /// Month number, 1-12
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    /// All categories tied for the highest transaction count
    pub popular_categories: Vec<String>,
}

// ========== Historical Analysis Models ==========

/// A category with an accumulated amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Average monthly expense for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: String,
    pub average: f64,
}

/// Expense totals per category within one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCategoryTotals {
    pub month: u32,
    pub categories: Vec<CategoryTotal>,
}

impl MonthCategoryTotals {
    pub fn total(&self) -> f64 {
        self.categories.iter().map(|c| c.amount).sum()
    }
}

/// The four fixed three-month seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }

    /// All seasons in fixed order
    pub fn all() -> &'static [Season] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Autumn]
    }

    pub fn months(&self) -> [u32; 3] {
        match self {
            Self::Winter => [12, 1, 2],
            Self::Spring => [3, 4, 5],
            Self::Summer => [6, 7, 8],
            Self::Autumn => [9, 10, 11],
        }
    }

    /// Season of a month number; None outside 1-12
    pub fn for_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Autumn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summed expenses for a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotal {
    pub season: Season,
    pub amount: f64,
}

/// Suggested cut for the highest-spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    /// Category at the reference rank the cut is measured against
    pub reference_category: String,
    /// Percent reduction, rounded to 2 decimals
    pub reduction_percent: f64,
}

/// A non-fatal shortage of data noticed during analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataGap {
    /// Fewer categories than the top-N ranking asks for
    TooFewCategoriesForRanking { required: usize, found: usize },
    /// Not enough distinct categories to pick a reference for a recommendation
    TooFewCategoriesForRecommendation { required: usize, found: usize },
    /// Highest category has no spending, so no reduction can be computed
    NoExpensesToReduce,
}

impl std::fmt::Display for DataGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewCategoriesForRanking { required, found } => write!(
                f,
                "top-{} ranking needs {} categories, found {}",
                required, required, found
            ),
            Self::TooFewCategoriesForRecommendation { required, found } => write!(
                f,
                "recommendation needs at least {} categories, found {}",
                required, found
            ),
            Self::NoExpensesToReduce => write!(f, "no expenses to reduce"),
        }
    }
}

/// Result of the historical spending analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAnalysis {
    /// Distinct month numbers present in the data
    pub months_analyzed: usize,
    pub average_costs: Vec<CategoryAverage>,
    pub seasonal_high: SeasonTotal,
    pub seasonal_low: SeasonTotal,
    pub biggest_expenses: Vec<CategoryTotal>,
    pub recommendation: Option<Recommendation>,
    /// Per-month expense totals by category, kept for budget planning
    pub category_data_by_month: Vec<MonthCategoryTotals>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub gaps: Vec<DataGap>,
}

// ========== Budget Models ==========

/// The three coarse budget buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetGroup {
    Essentials,
    Discretionary,
    Savings,
}

impl BudgetGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essentials => "essentials",
            Self::Discretionary => "discretionary",
            Self::Savings => "savings",
        }
    }
}

impl std::fmt::Display for BudgetGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accumulated money per budget group (not yet percentages)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub essentials: f64,
    pub discretionary: f64,
    pub savings: f64,
}

impl BudgetAllocation {
    pub fn total(&self) -> f64 {
        self.essentials + self.discretionary + self.savings
    }

    pub fn get(&self, group: BudgetGroup) -> f64 {
        match group {
            BudgetGroup::Essentials => self.essentials,
            BudgetGroup::Discretionary => self.discretionary,
            BudgetGroup::Savings => self.savings,
        }
    }
}

/// Whole-percent share of each budget group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetShares {
    pub essentials: i64,
    pub discretionary: i64,
    pub savings: i64,
}

impl BudgetShares {
    pub fn get(&self, group: BudgetGroup) -> i64 {
        match group {
            BudgetGroup::Essentials => self.essentials,
            BudgetGroup::Discretionary => self.discretionary,
            BudgetGroup::Savings => self.savings,
        }
    }
}

/// Outcome of comparing an allocation against the target bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub out_of_range: bool,
    pub shares: BudgetShares,
    /// Groups whose share fell outside their band
    pub violations: Vec<BudgetGroup>,
}
