use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, Budget, Expense, Session};

/// Snapshot of one user's data for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub username: String,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

/// Exporter for writing a user's expense history out of the database
pub struct Exporter<'a> {
    service: &'a LedgerService,
    session: &'a Session,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService, session: &'a Session) -> Self {
        Self { service, session }
    }

    /// Export the session user's expenses to CSV, in recorded order
    pub async fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.list_expenses(self.session.username()).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "category", "description", "amount"])?;

        for expense in &expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.category.to_string(),
                expense.description.clone(),
                format_cents(expense.amount_cents),
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }

    /// Export expenses and budgets as a single JSON document
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<ExpenseSnapshot> {
        let snapshot = ExpenseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            username: self.session.username().to_string(),
            expenses: self.service.list_expenses(self.session.username()).await?,
            budgets: self.service.list_budgets().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
