use chrono::NaiveDate;

use crate::domain::{
    hash_password, is_valid_amount, Budget, Category, Cents, Expense, Session, User, YearMonth,
};
use crate::storage::Repository;

use super::reporting::{
    budget_utilization, category_totals, expenses_in_month, monthly_trend, CategoryTotal,
    MonthlyTotal, Report, UtilizationReport,
};
use super::AppError;

/// Application service providing the tracker's operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
}

/// Everything the dashboard shows for one user.
pub struct Dashboard {
    pub username: String,
    /// Month the budget comparison was restricted to, if any
    pub month: Option<YearMonth>,
    pub expenses: Vec<Expense>,
    pub categories: Report<Vec<CategoryTotal>>,
    pub trend: Report<Vec<MonthlyTotal>>,
    pub utilization: Report<UtilizationReport>,
}

impl LedgerService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at the given path, creating the file and the
    /// tables if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Open an existing database. Missing tables are still created.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        repo.migrate().await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Auth operations
    // ========================

    /// Register a new user. Usernames are trimmed and must be unique.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidUsername);
        }

        if self.repo.get_user(username).await?.is_some() {
            return Err(AppError::UserAlreadyExists(username.to_string()));
        }

        let user = User::new(username.to_string(), password);
        self.repo.save_user(&user).await?;
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// both give `Ok(false)`; only storage failures are errors.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let password_hash = hash_password(password);
        Ok(self
            .repo
            .has_credentials(username.trim(), &password_hash)
            .await?)
    }

    /// Authenticate and open a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        if self.authenticate(username, password).await? {
            Ok(Session::new(username.trim().to_string()))
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense.
    pub async fn record_expense(
        &self,
        username: &str,
        date: NaiveDate,
        category: Category,
        description: String,
        amount_cents: Cents,
    ) -> Result<Expense, AppError> {
        if !is_valid_amount(amount_cents) {
            return Err(AppError::InvalidAmount(amount_cents));
        }

        let expense = Expense::new(
            username.to_string(),
            date,
            category,
            description,
            amount_cents,
        );
        self.repo.save_expense(&expense).await?;
        Ok(expense)
    }

    /// List a user's expenses in the order they were recorded.
    pub async fn list_expenses(&self, username: &str) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses_for_user(username).await?)
    }

    // ========================
    // Budget operations
    // ========================

    /// Set the budget for a category, replacing the current one.
    ///
    /// Budgets are shared: the category's budget is replaced for every
    /// user, not just `username`.
    pub async fn set_budget(
        &self,
        username: &str,
        category: Category,
        amount_cents: Cents,
    ) -> Result<Budget, AppError> {
        if !is_valid_amount(amount_cents) {
            return Err(AppError::InvalidAmount(amount_cents));
        }

        let budget = Budget::new(username.to_string(), category, amount_cents);
        self.repo.upsert_budget(&budget).await?;
        Ok(budget)
    }

    /// List all budgets across users.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>, AppError> {
        Ok(self.repo.list_budgets().await?)
    }

    // ========================
    // Reports
    // ========================

    /// Spending per category for a user.
    pub async fn category_report(
        &self,
        username: &str,
    ) -> Result<Report<Vec<CategoryTotal>>, AppError> {
        let expenses = self.list_expenses(username).await?;
        Ok(category_totals(&expenses))
    }

    /// Spending per month for a user.
    pub async fn monthly_report(
        &self,
        username: &str,
    ) -> Result<Report<Vec<MonthlyTotal>>, AppError> {
        let expenses = self.list_expenses(username).await?;
        Ok(monthly_trend(&expenses))
    }

    /// Budget vs. actual for a user, over all expenses or a single month.
    pub async fn utilization_report(
        &self,
        username: &str,
        month: Option<YearMonth>,
    ) -> Result<Report<UtilizationReport>, AppError> {
        let mut expenses = self.list_expenses(username).await?;
        if let Some(month) = month {
            expenses = expenses_in_month(&expenses, month);
        }
        let budgets = self.list_budgets().await?;
        Ok(budget_utilization(&expenses, &budgets))
    }

    /// History and all three reports for the logged-in user.
    pub async fn dashboard(
        &self,
        session: &Session,
        month: Option<YearMonth>,
    ) -> Result<Dashboard, AppError> {
        let expenses = self.list_expenses(session.username()).await?;
        let budgets = self.list_budgets().await?;

        let categories = category_totals(&expenses);
        let trend = monthly_trend(&expenses);
        let utilization = match month {
            Some(month) => budget_utilization(&expenses_in_month(&expenses, month), &budgets),
            None => budget_utilization(&expenses, &budgets),
        };

        Ok(Dashboard {
            username: session.username().to_string(),
            month,
            expenses,
            categories,
            trend,
            utilization,
        })
    }
}
