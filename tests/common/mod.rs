// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use pocketbook::application::LedgerService;
use pocketbook::domain::{Category, Cents, Session};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Register a user and log them in
pub async fn signed_in(service: &LedgerService, username: &str) -> Result<Session> {
    service.register(username, "password").await?;
    Ok(service.login(username, "password").await?)
}

/// Record an expense with an empty description
pub async fn spend(
    service: &LedgerService,
    session: &Session,
    date: &str,
    category: Category,
    amount: Cents,
) -> Result<()> {
    service
        .record_expense(
            session.username(),
            parse_date(date),
            category,
            String::new(),
            amount,
        )
        .await?;
    Ok(())
}
