use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Budget, Category, Expense, User};

use super::MIGRATION_001_INITIAL;

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long an operation waits for the single pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for persisting and querying users, expenses and budgets.
///
/// Holds a pool capped at one connection: each call checks the connection
/// out for the duration of the query and returns it afterwards.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL such as `sqlite:data.db`.
    /// Append `?mode=rwc` to create the file when it is missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create any missing tables. Safe to call on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;
        Ok(())
    }

    /// Get a user by username.
    pub async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Whether a row matches both the username and the password digest.
    pub async fn has_credentials(&self, username: &str, password_hash: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS found
            FROM users
            WHERE username = ? AND password_hash = ?
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check credentials")?;

        Ok(row.is_some())
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let created_at_str: String = row.get("created_at");

        Ok(User {
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Append an expense.
    pub async fn save_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, username, date, category, description, amount_cents, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id.to_string())
        .bind(&expense.username)
        .bind(expense.date.format(DATE_FORMAT).to_string())
        .bind(expense.category.as_str())
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;
        Ok(())
    }

    /// List a user's expenses in the order they were recorded.
    pub async fn list_expenses_for_user(&self, username: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, date, category, description, amount_cents, recorded_at
            FROM expenses
            WHERE username = ?
            ORDER BY rowid
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
        let id_str: String = row.get("id");
        let date_str: String = row.get("date");
        let category_str: String = row.get("category");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Expense {
            id: Uuid::parse_str(&id_str).context("Invalid expense ID")?,
            username: row.get("username"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid expense date: {}", date_str))?,
            category: Category::from_str(&category_str)?,
            description: row.get("description"),
            amount_cents: row.get("amount_cents"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Insert a budget, replacing the existing row for the same category.
    pub async fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (username, category, amount_cents)
            VALUES (?, ?, ?)
            ON CONFLICT(category) DO UPDATE SET
                username = excluded.username,
                amount_cents = excluded.amount_cents
            "#,
        )
        .bind(&budget.username)
        .bind(budget.category.as_str())
        .bind(budget.amount_cents)
        .execute(&self.pool)
        .await
        .context("Failed to save budget")?;
        Ok(())
    }

    /// List every budget, across all users, in the order first set.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            r#"
            SELECT username, category, amount_cents
            FROM budgets
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    fn row_to_budget(row: &SqliteRow) -> Result<Budget> {
        let category_str: String = row.get("category");

        Ok(Budget {
            username: row.get("username"),
            category: Category::from_str(&category_str)?,
            amount_cents: row.get("amount_cents"),
        })
    }
}
