use serde::{Deserialize, Serialize};

use super::{Category, Cents};

/// Monthly spending ceiling for a category.
///
/// Budgets are keyed by category alone: setting a budget replaces the row
/// for that category whoever wrote it, so `username` only records the last
/// writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub username: String,
    pub category: Category,
    pub amount_cents: Cents,
}

impl Budget {
    pub fn new(username: String, category: Category, amount_cents: Cents) -> Self {
        Self {
            username,
            category,
            amount_cents,
        }
    }
}
