//! Budget allocation and compliance against target bands
//!
//! Spending is split into essentials and discretionary through the configured
//! [`BudgetGroups`]; savings are what remained of each month's income.

use std::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::config::BudgetGroups;
use crate::error::{Error, Result};
use crate::models::{
    BudgetAllocation, BudgetGroup, BudgetShares, ComplianceReport, HistoricalAnalysis, MonthStats,
};
use crate::stats::is_negligible;

/// Target share of essentials, in whole percent
pub const ESSENTIALS_BAND: RangeInclusive<i64> = 45..=55;

/// Target share of discretionary spending, in whole percent
pub const DISCRETIONARY_BAND: RangeInclusive<i64> = 25..=35;

/// Target share of savings, in whole percent
pub const SAVINGS_BAND: RangeInclusive<i64> = 15..=25;

pub fn target_band(group: BudgetGroup) -> RangeInclusive<i64> {
    match group {
        BudgetGroup::Essentials => ESSENTIALS_BAND,
        BudgetGroup::Discretionary => DISCRETIONARY_BAND,
        BudgetGroup::Savings => SAVINGS_BAND,
    }
}

/// Accumulate money per budget group over the analyzed months.
///
/// Categories in neither spending group are skipped. Savings for a month are
/// income minus expenses from the matching [`MonthStats`]; a month without
/// stats adds nothing. A month that overspent lowers the savings total.
pub fn create_budget_allocation(
    monthly_stats: &[MonthStats],
    analysis: &HistoricalAnalysis,
    groups: &BudgetGroups,
) -> BudgetAllocation {
    let mut allocation = BudgetAllocation::default();

    for month in &analysis.category_data_by_month {
        for total in &month.categories {
            match groups.group_of(&total.category) {
                Some(BudgetGroup::Essentials) => allocation.essentials += total.amount,
                Some(BudgetGroup::Discretionary) => allocation.discretionary += total.amount,
                Some(BudgetGroup::Savings) | None => {}
            }
        }

        match monthly_stats.iter().find(|m| m.month == month.month) {
            Some(stats) => allocation.savings += stats.income - stats.expenses,
            None => debug!("No monthly stats for month {}, no savings counted", month.month),
        }
    }

    debug!(
        "Allocation: essentials {:.2}, discretionary {:.2}, savings {:.2}",
        allocation.essentials, allocation.discretionary, allocation.savings
    );
    allocation
}

/// Whole-percent shares of an allocation and whether any falls outside its band.
///
/// The total must be positive. A zero total (up to half a cent) or a negative
/// one, where the savings deficit outweighs grouped spending, has no shares.
pub fn check_budget_compliance(allocation: &BudgetAllocation) -> Result<ComplianceReport> {
    let total = allocation.total();
    if is_negligible(total) {
        return Err(Error::DivisionByZero("total budget allocation is zero"));
    }
    if total < 0.0 {
        warn!("Total budget allocation is negative: {:.2}", total);
        return Err(Error::DivisionByZero("total budget allocation is not positive"));
    }

    let share = |amount: f64| (amount / total * 100.0).round() as i64;
    let shares = BudgetShares {
        essentials: share(allocation.essentials),
        discretionary: share(allocation.discretionary),
        savings: share(allocation.savings),
    };

    let violations: Vec<BudgetGroup> = [
        BudgetGroup::Essentials,
        BudgetGroup::Discretionary,
        BudgetGroup::Savings,
    ]
    .into_iter()
    .filter(|&group| !target_band(group).contains(&shares.get(group)))
    .collect();

    for group in &violations {
        let band = target_band(*group);
        warn!(
            "{} at {}% is outside {}-{}%",
            group,
            shares.get(*group),
            band.start(),
            band.end()
        );
    }

    Ok(ComplianceReport {
        out_of_range: !violations.is_empty(),
        shares,
        violations,
    })
}
