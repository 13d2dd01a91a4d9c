use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Budget, Category, Cents, Expense, YearMonth};

/// Reference line for budget utilization: spending at 100% of the budget.
pub const UTILIZATION_THRESHOLD: f64 = 100.0;

/// Outcome of an aggregation. `NoData` means there was nothing meaningful
/// to aggregate, which is different from a report whose totals are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Report<T> {
    Data(T),
    NoData,
}

impl<T> Report<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Report::NoData)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Report::Data(data) => Some(data),
            Report::NoData => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Report::Data(data) => Some(data),
            Report::NoData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Cents,
    pub count: usize,
    /// Share of the grand total, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub total: Cents,
    pub count: usize,
}

/// Spend-to-budget ratio. A zero budget has no meaningful ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Utilization {
    Percent(f64),
    Undefined,
}

impl Utilization {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Utilization::Percent(p) => Some(*p),
            Utilization::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub category: Category,
    pub budget: Cents,
    pub spent: Cents,
    pub utilization: Utilization,
}

impl BudgetUtilization {
    /// True when spending is strictly above the threshold. Undefined
    /// utilization is never over.
    pub fn is_over(&self, threshold: f64) -> bool {
        self.utilization.percent().is_some_and(|p| p > threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    pub threshold: f64,
    pub entries: Vec<BudgetUtilization>,
}

impl UtilizationReport {
    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetUtilization> {
        self.entries.iter().filter(|e| e.is_over(self.threshold))
    }
}

/// Sum of amounts and number of expenses per category. Sums saturate at
/// `Cents::MAX` instead of overflowing.
fn sum_by_category(expenses: &[Expense]) -> BTreeMap<Category, (Cents, usize)> {
    let mut sums: BTreeMap<Category, (Cents, usize)> = BTreeMap::new();
    for expense in expenses {
        let entry = sums.entry(expense.category).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(expense.amount_cents);
        entry.1 += 1;
    }
    sums
}

/// Spending per category, in category order.
///
/// Returns `NoData` for an empty ledger and for one whose amounts add up to
/// zero, since there is no distribution to show.
pub fn category_totals(expenses: &[Expense]) -> Report<Vec<CategoryTotal>> {
    let sums = sum_by_category(expenses);
    let grand_total = sums
        .values()
        .fold(0, |acc: Cents, (total, _)| acc.saturating_add(*total));
    if sums.is_empty() || grand_total == 0 {
        return Report::NoData;
    }

    let totals = sums
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
            percentage: total as f64 / grand_total as f64 * 100.0,
        })
        .collect();

    Report::Data(totals)
}

/// Spending per calendar month, oldest first.
///
/// Every month between the first and the last expense is present; months
/// without expenses have a zero total.
pub fn monthly_trend(expenses: &[Expense]) -> Report<Vec<MonthlyTotal>> {
    let mut sums: BTreeMap<YearMonth, (Cents, usize)> = BTreeMap::new();
    for expense in expenses {
        let entry = sums.entry(expense.month()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(expense.amount_cents);
        entry.1 += 1;
    }

    let (Some(first), Some(last)) = (
        sums.keys().next().copied(),
        sums.keys().next_back().copied(),
    ) else {
        return Report::NoData;
    };

    let mut trend = Vec::new();
    let mut month = first;
    loop {
        let (total, count) = sums.get(&month).copied().unwrap_or((0, 0));
        trend.push(MonthlyTotal {
            month,
            total,
            count,
        });
        if month == last {
            break;
        }
        month = month.next();
    }

    Report::Data(trend)
}

/// Compare spending against every budget.
///
/// Each budget yields one entry, in budget order, even with no spending in
/// its category. Spending in categories without a budget is left out.
pub fn budget_utilization(expenses: &[Expense], budgets: &[Budget]) -> Report<UtilizationReport> {
    if budgets.is_empty() {
        return Report::NoData;
    }

    let sums = sum_by_category(expenses);
    let entries = budgets
        .iter()
        .map(|budget| {
            let spent = sums.get(&budget.category).map_or(0, |(total, _)| *total);
            let utilization = if budget.amount_cents == 0 {
                Utilization::Undefined
            } else {
                Utilization::Percent(spent as f64 / budget.amount_cents as f64 * 100.0)
            };
            BudgetUtilization {
                category: budget.category,
                budget: budget.amount_cents,
                spent,
                utilization,
            }
        })
        .collect();

    Report::Data(UtilizationReport {
        threshold: UTILIZATION_THRESHOLD,
        entries,
    })
}

/// Expenses whose date falls in `month`.
pub fn expenses_in_month(expenses: &[Expense], month: YearMonth) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .cloned()
        .collect()
}
