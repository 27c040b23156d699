//! Historical spending analysis
//!
//! Works over whatever date range the transactions cover:
//! - Per-month expense totals by category
//! - Average monthly cost per category (over the months present)
//! - Biggest categories overall
//! - Highest and lowest spending seasons
//! - A suggested cut for the top category

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    CategoryAverage, CategoryTotal, DataGap, HistoricalAnalysis, MonthCategoryTotals,
    Recommendation, Season, SeasonTotal, Transaction,
};
use crate::stats::{group_by_month, is_negligible, round2, CategoryAccumulator};

/// How many categories count as "biggest expenses"
pub const TOP_CATEGORY_COUNT: usize = 3;

/// The reference category for a recommendation sits at rank `n / REFERENCE_RANK_DIVISOR`
pub const REFERENCE_RANK_DIVISOR: usize = 4;

/// Fewest distinct expense categories needed to recommend a reduction
pub const MIN_CATEGORIES_FOR_RECOMMENDATION: usize = 2;

/// Expense totals per category for every month present, ascending by month.
///
/// A month that only has income still appears, with no categories.
pub fn expenses_by_month_and_category(transactions: &[Transaction]) -> Vec<MonthCategoryTotals> {
    group_by_month(transactions)
        .into_iter()
        .map(|(month, bucket)| {
            let mut acc = CategoryAccumulator::default();
            for tx in bucket.into_iter().filter(|t| t.is_expense()) {
                acc.add(&tx.category, tx.amount);
            }
            MonthCategoryTotals {
                month,
                categories: acc.into_totals(),
            }
        })
        .collect()
}

/// Expense total per category over the whole input, in first-appearance order
pub fn lifetime_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut acc = CategoryAccumulator::default();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        acc.add(&tx.category, tx.amount);
    }
    acc.into_totals()
}

/// Sort descending by amount. Equal amounts keep their input order.
pub fn rank_categories(totals: &[CategoryTotal]) -> Vec<CategoryTotal> {
    let mut ranked = totals.to_vec();
    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    ranked
}

/// The `n` largest categories
pub fn top_categories(totals: &[CategoryTotal], n: usize) -> Result<Vec<CategoryTotal>> {
    if totals.len() < n {
        return Err(Error::InsufficientData(format!(
            "top-{} ranking needs {} categories, found {}",
            n,
            n,
            totals.len()
        )));
    }
    Ok(rank_categories(totals).into_iter().take(n).collect())
}

/// Expense totals per season, highest first.
///
/// Seasons with no month in the data are left out. Seasons with equal totals
/// stay in winter, spring, summer, autumn order.
pub fn seasonal_totals(months: &[MonthCategoryTotals]) -> Vec<SeasonTotal> {
    let mut seasons: Vec<SeasonTotal> = Season::all()
        .iter()
        .filter_map(|&season| {
            let in_season: Vec<&MonthCategoryTotals> = months
                .iter()
                .filter(|m| Season::for_month(m.month) == Some(season))
                .collect();
            if in_season.is_empty() {
                return None;
            }
            Some(SeasonTotal {
                season,
                amount: in_season.iter().map(|m| m.total()).sum(),
            })
        })
        .collect();

    seasons.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    seasons
}

/// Suggest cutting the top category down toward the reference category.
///
/// `ranked` must already be sorted with [`rank_categories`]. The reference is
/// at index `n / REFERENCE_RANK_DIVISOR`, never lower than 1.
pub fn recommend_reduction(ranked: &[CategoryTotal]) -> Result<Recommendation> {
    if ranked.len() < MIN_CATEGORIES_FOR_RECOMMENDATION {
        return Err(Error::InsufficientData(format!(
            "recommendation needs at least {} categories, found {}",
            MIN_CATEGORIES_FOR_RECOMMENDATION,
            ranked.len()
        )));
    }

    let highest = &ranked[0];
    let reference = &ranked[(ranked.len() / REFERENCE_RANK_DIVISOR).max(1)];

    if is_negligible(highest.amount) {
        return Err(Error::DivisionByZero("highest category total is zero"));
    }

    let reduction_percent = round2((highest.amount - reference.amount) / highest.amount * 100.0);

    debug!(
        "Recommend cutting {} by {:.2}% (reference: {})",
        highest.category, reduction_percent, reference.category
    );

    Ok(Recommendation {
        category: highest.category.clone(),
        reference_category: reference.category.clone(),
        reduction_percent,
    })
}

/// Run the full historical analysis.
///
/// Only an input without any month is an error. Shortages that still allow a
/// partial result are recorded in [`HistoricalAnalysis::gaps`].
pub fn analyze_history(transactions: &[Transaction]) -> Result<HistoricalAnalysis> {
    let months = expenses_by_month_and_category(transactions);
    let months_analyzed = months.len();
    if months_analyzed == 0 {
        return Err(Error::InsufficientData(
            "at least one month of transactions is required".into(),
        ));
    }

    let lifetime = lifetime_totals(transactions);
    let average_costs = lifetime
        .iter()
        .map(|c| CategoryAverage {
            category: c.category.clone(),
            average: round2(c.amount / months_analyzed as f64),
        })
        .collect();

    let seasons = seasonal_totals(&months);
    let (Some(seasonal_high), Some(seasonal_low)) = (seasons.first(), seasons.last()) else {
        return Err(Error::InsufficientData("no season has data".into()));
    };
    let (seasonal_high, seasonal_low) = (seasonal_high.clone(), seasonal_low.clone());

    let mut gaps = Vec::new();
    let ranked = rank_categories(&lifetime);

    if ranked.len() < TOP_CATEGORY_COUNT {
        let gap = DataGap::TooFewCategoriesForRanking {
            required: TOP_CATEGORY_COUNT,
            found: ranked.len(),
        };
        warn!("Partial analysis: {}", gap);
        gaps.push(gap);
    }
    let biggest_expenses = ranked.iter().take(TOP_CATEGORY_COUNT).cloned().collect();

    let recommendation = match recommend_reduction(&ranked) {
        Ok(rec) => Some(rec),
        Err(Error::InsufficientData(_)) => {
            let gap = DataGap::TooFewCategoriesForRecommendation {
                required: MIN_CATEGORIES_FOR_RECOMMENDATION,
                found: ranked.len(),
            };
            warn!("No recommendation: {}", gap);
            gaps.push(gap);
            None
        }
        Err(Error::DivisionByZero(_)) => {
            warn!("No recommendation: {}", DataGap::NoExpensesToReduce);
            gaps.push(DataGap::NoExpensesToReduce);
            None
        }
        Err(e) => return Err(e),
    };

    debug!(
        "Analyzed {} months, {} categories, high season {} / low season {}",
        months_analyzed,
        ranked.len(),
        seasonal_high.season,
        seasonal_low.season
    );

    Ok(HistoricalAnalysis {
        months_analyzed,
        average_costs,
        seasonal_high,
        seasonal_low,
        biggest_expenses,
        recommendation,
        category_data_by_month: months,
        gaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlowDirection;
    use chrono::NaiveDate;

    fn expense(date: &str, amount: f64, category: &str) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::new(date, amount, category, FlowDirection::Expense, category)
    }

    fn income(date: &str, amount: f64) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::new(date, amount, "Salary", FlowDirection::Income, "income")
    }

    fn total(category: &str, amount: f64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            amount,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            expense("2024-01-05", 100.0, "food"),
            expense("2024-01-06", 50.0, "transport"),
            expense("2024-02-10", 200.0, "food"),
            expense("2024-02-11", 250.0, "entertainment"),
            expense("2024-07-01", 40.0, "health"),
            income("2024-07-02", 1000.0),
        ]
    }

    #[test]
    fn test_expenses_by_month_and_category() {
        let months = expenses_by_month_and_category(&sample());
        assert_eq!(months.len(), 3);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].categories, vec![total("food", 100.0), total("transport", 50.0)]);
        assert_eq!(months[2].month, 7);
        assert_eq!(months[2].categories, vec![total("health", 40.0)]);
    }

    #[test]
    fn test_income_only_month_is_kept_empty() {
        let txs = vec![expense("2024-03-01", 10.0, "food"), income("2024-04-01", 500.0)];
        let months = expenses_by_month_and_category(&txs);
        assert_eq!(months.len(), 2);
        assert!(months[1].categories.is_empty());
        assert_eq!(months[1].total(), 0.0);
    }

    #[test]
    fn test_averages_divide_by_months_present() {
        let analysis = analyze_history(&sample()).unwrap();
        assert_eq!(analysis.months_analyzed, 3);

        let food = analysis
            .average_costs
            .iter()
            .find(|c| c.category == "food")
            .unwrap();
        assert!((food.average - 100.0).abs() < 0.01);

        let transport = analysis
            .average_costs
            .iter()
            .find(|c| c.category == "transport")
            .unwrap();
        assert_eq!(transport.average, 16.67);
    }

    #[test]
    fn test_rank_categories_is_stable() {
        let totals = vec![
            total("a", 10.0),
            total("b", 30.0),
            total("c", 10.0),
            total("d", 30.0),
        ];
        let ranked = rank_categories(&totals);
        let names: Vec<&str> = ranked.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_top_categories() {
        let totals = lifetime_totals(&sample());
        let top = top_categories(&totals, TOP_CATEGORY_COUNT).unwrap();
        let names: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["food", "entertainment", "transport"]);

        let err = top_categories(&totals[..2], TOP_CATEGORY_COUNT).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_seasonal_totals_sum_to_monthly_totals() {
        let months = expenses_by_month_and_category(&sample());
        let seasons = seasonal_totals(&months);

        let season_sum: f64 = seasons.iter().map(|s| s.amount).sum();
        let month_sum: f64 = months.iter().map(|m| m.total()).sum();
        assert!((season_sum - month_sum).abs() < 0.01);

        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].season, Season::Winter);
        assert!((seasons[0].amount - 600.0).abs() < 0.01);
        assert_eq!(seasons[1].season, Season::Summer);
    }

    #[test]
    fn test_december_counts_as_winter() {
        let txs = vec![
            expense("2023-12-20", 70.0, "food"),
            expense("2024-06-01", 10.0, "food"),
        ];
        let seasons = seasonal_totals(&expenses_by_month_and_category(&txs));
        assert_eq!(seasons[0].season, Season::Winter);
        assert_eq!(seasons[0].amount, 70.0);
    }

    #[test]
    fn test_recommendation_uses_reference_rank() {
        let ranked = rank_categories(&lifetime_totals(&sample()));
        let rec = recommend_reduction(&ranked).unwrap();
        // 4 categories -> reference index 1 (entertainment, 250 vs food 300)
        assert_eq!(rec.category, "food");
        assert_eq!(rec.reference_category, "entertainment");
        assert_eq!(rec.reduction_percent, 16.67);
    }

    #[test]
    fn test_recommendation_reference_scales_with_category_count() {
        let ranked: Vec<CategoryTotal> = (0..8)
            .map(|i| total(&format!("c{}", i), 800.0 - 100.0 * i as f64))
            .collect();
        let rec = recommend_reduction(&ranked).unwrap();
        assert_eq!(rec.reference_category, "c2");
        assert_eq!(rec.reduction_percent, 25.0);
    }

    #[test]
    fn test_recommendation_with_zero_highest() {
        let ranked = vec![total("a", 0.0), total("b", 0.0)];
        assert!(matches!(
            recommend_reduction(&ranked),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_single_month_single_category() {
        let txs = vec![
            expense("2024-05-01", 20.0, "food"),
            expense("2024-05-09", 30.0, "food"),
        ];

        let analysis = analyze_history(&txs).unwrap();
        assert_eq!(analysis.seasonal_high.season, analysis.seasonal_low.season);
        assert_eq!(analysis.seasonal_high.season, Season::Spring);
        assert!(analysis.recommendation.is_none());
        assert!(analysis.gaps.contains(&DataGap::TooFewCategoriesForRecommendation {
            required: MIN_CATEGORIES_FOR_RECOMMENDATION,
            found: 1,
        }));
        assert!(analysis.gaps.contains(&DataGap::TooFewCategoriesForRanking {
            required: TOP_CATEGORY_COUNT,
            found: 1,
        }));

        let ranked = rank_categories(&lifetime_totals(&txs));
        assert!(recommend_reduction(&ranked).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_analysis_with_enough_data_has_no_gaps() {
        let analysis = analyze_history(&sample()).unwrap();
        assert!(analysis.gaps.is_empty());
        assert_eq!(analysis.biggest_expenses.len(), TOP_CATEGORY_COUNT);
        assert!(analysis.recommendation.is_some());
        assert_eq!(analysis.category_data_by_month.len(), 3);
    }

    #[test]
    fn test_income_only_analysis_has_no_recommendation() {
        let txs = vec![income("2024-01-01", 100.0)];
        let analysis = analyze_history(&txs).unwrap();
        assert!(analysis.biggest_expenses.is_empty());
        assert!(analysis.recommendation.is_none());
        assert_eq!(analysis.seasonal_high.amount, 0.0);
    }

    #[test]
    fn test_empty_input_is_insufficient_data() {
        let err = analyze_history(&[]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let txs = sample();
        assert_eq!(analyze_history(&txs).unwrap(), analyze_history(&txs).unwrap());
    }
}
