//! Aggregates, low-satisfaction detection, goal projection and chart weights
//! over a snapshot of recorded entries.
//!
//! Everything here is a pure function of its inputs: no storage access, no
//! errors. Inputs that would divide by zero produce a zero sentinel instead.
//! Sums saturate at `Decimal::MAX` rather than overflowing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{RatedTransaction, Transaction};

pub(crate) const DEFAULT_LOW_SATISFACTION_THRESHOLD: u8 = 5;

/// Weights sum to this value across all expenses.
pub(crate) const WEIGHT_SCALE: Decimal = Decimal::ONE_THOUSAND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) net: Decimal,
}

pub(crate) fn aggregate_totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), t| {
            if t.is_income() {
                (income.saturating_add(t.amount), expense)
            } else {
                (income, expense.saturating_add(t.amount))
            }
        },
    );
    Totals {
        income,
        expense,
        net: income.saturating_sub(expense),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LowSatisfactionDetail {
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LowSatisfactionReport {
    pub(crate) total_wasted: Decimal,
    pub(crate) count: usize,
    pub(crate) details: Vec<LowSatisfactionDetail>,
}

/// Expenses rated strictly below `threshold`, in input order.
pub(crate) fn find_low_satisfaction_expenses(
    rated: &[RatedTransaction],
    threshold: u8,
) -> LowSatisfactionReport {
    let details: Vec<LowSatisfactionDetail> = rated
        .iter()
        .filter(|r| r.transaction.is_expense() && r.level() < threshold)
        .map(|r| LowSatisfactionDetail {
            description: r.transaction.description.clone(),
            amount: r.transaction.amount,
            level: r.level(),
        })
        .collect();

    LowSatisfactionReport {
        total_wasted: saturating_sum(details.iter().map(|d| d.amount)),
        count: details.len(),
        details,
    }
}

/// Months to reach a goal, with and without the recoverable spending.
///
/// A month value of zero means either the goal is zero or the savings rate
/// was not positive; it is never "already reached" on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct GoalProjection {
    pub(crate) months_baseline: Decimal,
    pub(crate) months_optimized: Decimal,
    pub(crate) months_saved: Decimal,
}

pub(crate) fn project_goal_timeline(
    goal_amount: Decimal,
    base_monthly_savings: Decimal,
    recoverable_monthly_amount: Decimal,
) -> GoalProjection {
    let baseline = months_at_rate(goal_amount, base_monthly_savings);
    let optimized = base_monthly_savings
        .checked_add(recoverable_monthly_amount)
        .map_or(Decimal::ZERO, |rate| months_at_rate(goal_amount, rate));
    GoalProjection {
        months_baseline: round_months(baseline),
        months_optimized: round_months(optimized),
        months_saved: round_months(baseline.saturating_sub(optimized)),
    }
}

fn months_at_rate(goal_amount: Decimal, monthly: Decimal) -> Decimal {
    if monthly <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    goal_amount.checked_div(monthly).unwrap_or(Decimal::ZERO)
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// One decimal place, halves rounded away from zero.
fn round_months(months: Decimal) -> Decimal {
    months.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VisualizationWeight {
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) satisfaction_level: u8,
    /// Relative size for charts. Not a percentage.
    pub(crate) weight: Decimal,
}

pub(crate) fn compute_visualization_weights(rated: &[RatedTransaction]) -> Vec<VisualizationWeight> {
    let expenses: Vec<&RatedTransaction> =
        rated.iter().filter(|r| r.transaction.is_expense()).collect();

    let mut total = saturating_sum(expenses.iter().map(|r| r.transaction.amount));
    if total.is_zero() {
        total = Decimal::ONE;
    }

    expenses
        .into_iter()
        .map(|r| VisualizationWeight {
            description: r.transaction.description.clone(),
            amount: r.transaction.amount,
            satisfaction_level: r.level(),
            weight: r
                .transaction
                .amount
                .checked_div(total)
                .and_then(|share| share.checked_mul(WEIGHT_SCALE))
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Everything read from storage in one consistent pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) rated: Vec<RatedTransaction>,
}

/// The four computations run against one snapshot, with the wasted total
/// fed into the projection as the recoverable monthly amount.
#[derive(Debug, Clone)]
pub(crate) struct InsightReport {
    pub(crate) threshold: u8,
    pub(crate) goal_amount: Decimal,
    pub(crate) base_monthly_savings: Decimal,
    pub(crate) totals: Totals,
    pub(crate) low_satisfaction: LowSatisfactionReport,
    pub(crate) projection: GoalProjection,
    pub(crate) weights: Vec<VisualizationWeight>,
}

impl InsightReport {
    pub(crate) fn build(
        snapshot: &Snapshot,
        threshold: u8,
        goal_amount: Decimal,
        base_monthly_savings: Decimal,
    ) -> Self {
        let totals = aggregate_totals(&snapshot.transactions);
        let low_satisfaction = find_low_satisfaction_expenses(&snapshot.rated, threshold);
        let projection = project_goal_timeline(
            goal_amount,
            base_monthly_savings,
            low_satisfaction.total_wasted,
        );
        let weights = compute_visualization_weights(&snapshot.rated);

        tracing::debug!(
            threshold,
            flagged = low_satisfaction.count,
            wasted = %low_satisfaction.total_wasted,
            "Built insight report"
        );

        Self {
            threshold,
            goal_amount,
            base_monthly_savings,
            totals,
            low_satisfaction,
            projection,
            weights,
        }
    }

    /// True when no expense falls below the threshold.
    pub(crate) fn is_all_aligned(&self) -> bool {
        self.low_satisfaction.count == 0
    }
}
