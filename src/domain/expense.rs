use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Cents, YearMonth};

pub type ExpenseId = Uuid;

/// A single dated expense. Expenses are immutable once recorded; there is
/// no edit or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Owner of the expense
    pub username: String,
    /// Calendar date the money was spent
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// When the expense was entered
    pub recorded_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        username: String,
        date: NaiveDate,
        category: Category,
        description: String,
        amount_cents: Cents,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            date,
            category,
            description,
            amount_cents,
            recorded_at: Utc::now(),
        }
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}
