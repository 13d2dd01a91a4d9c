use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{
    CategoryTotal, Dashboard, LedgerService, MonthlyTotal, Report, Utilization,
    UtilizationReport,
};
use crate::domain::{format_cents, parse_cents, Category, Cents, Expense, Session, YearMonth};

/// Pocketbook - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "A local-first expense tracker with per-category monthly budgets")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "POCKETBOOK_DB", default_value = "pocketbook.db")]
    pub database: String,

    /// Username to sign up or log in as
    #[arg(short, long, env = "POCKETBOOK_USER")]
    pub user: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long, env = "POCKETBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Create a new account
    Signup,

    /// Check credentials
    Login,

    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        amount: String,

        /// Category: Food, Transport, Shopping, Health, Other
        #[arg(short, long)]
        category: String,

        /// Description of the expense
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show expense history
    History {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table", value_parser = ["table", "json", "csv"])]
        format: String,
    },

    /// Generate spending reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show history and all reports
    Dashboard {
        /// Compare budgets against a single month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Export expense history to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly budget for a category (replaces the current one)
    Set {
        /// Category: Food, Transport, Shopping, Health, Other
        category: String,

        /// Budget amount (e.g., "400" or "400.00")
        amount: String,
    },

    /// List all budgets
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Spending distribution by category
    Categories {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table", value_parser = ["table", "json", "csv"])]
        format: String,
    },

    /// Spending per calendar month
    Monthly {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table", value_parser = ["table", "json", "csv"])]
        format: String,
    },

    /// Budget vs. actual spending
    Budget {
        /// Only count expenses from this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table", value_parser = ["table", "json", "csv"])]
        format: String,
    },
}

impl Cli {
    fn log(&self, message: impl Display) {
        if self.verbose {
            eprintln!("[pocketbook] {}", message);
        }
    }

    fn username(&self) -> Result<String> {
        self.user
            .clone()
            .context("No user given. Pass --user or set POCKETBOOK_USER")
    }

    fn password(&self, prompt: &str) -> Result<String> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => rpassword::prompt_password(prompt).context("Failed to read password"),
        }
    }

    async fn open_session(&self, service: &LedgerService) -> Result<Session> {
        let username = self.username()?;
        let password = self.password("Password: ")?;
        let session = service
            .login(&username, &password)
            .await
            .with_context(|| format!("Login failed for '{}'", username))?;
        self.log(format_args!("logged in as {}", session.username()));
        Ok(session)
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Signup => {
                let service = LedgerService::init(&self.database).await?;
                let username = self.username()?;
                let password = self.password("New password: ")?;
                let user = service.register(&username, &password).await?;
                self.log(format_args!("registered {} in {}", user.username, self.database));
                println!("Account created: {}. Log in with --user {}", user.username, user.username);
            }

            command => {
                let service = LedgerService::connect(&self.database)
                    .await
                    .with_context(|| {
                        format!(
                            "Cannot open database '{}'. Run `pocketbook init` first",
                            self.database
                        )
                    })?;
                let session = self.open_session(&service).await?;
                run_session_command(&service, &session, command).await?;
            }
        }

        Ok(())
    }
}

async fn run_session_command(
    service: &LedgerService,
    session: &Session,
    command: &Commands,
) -> Result<()> {
    match command {
        Commands::Init | Commands::Signup => {}

        Commands::Login => {
            println!("Logged in as {}", session.username());
        }

        Commands::Add {
            amount,
            category,
            description,
            date,
        } => {
            let amount_cents =
                parse_cents(amount).context("Invalid amount format. Use '12.50' or '12'")?;
            let category: Category = category.parse()?;
            let date = match date {
                Some(date_str) => parse_date(date_str)?,
                None => Local::now().date_naive(),
            };

            let expense = service
                .record_expense(
                    session.username(),
                    date,
                    category,
                    description.clone(),
                    amount_cents,
                )
                .await?;
            println!(
                "Recorded expense: {} {} on {} ({})",
                format_cents(expense.amount_cents),
                expense.category,
                expense.date.format("%Y-%m-%d"),
                expense.id
            );
        }

        Commands::Budget(budget_cmd) => {
            run_budget_command(service, session, budget_cmd).await?;
        }

        Commands::History { format } => {
            let expenses = service.list_expenses(session.username()).await?;
            print_history(&expenses, format)?;
        }

        Commands::Report(report_cmd) => {
            run_report_command(service, session, report_cmd).await?;
        }

        Commands::Dashboard { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let dashboard = service.dashboard(session, month).await?;
            print_dashboard(&dashboard);
        }

        Commands::Export { format, output } => {
            run_export_command(service, session, format, output.as_deref()).await?;
        }
    }

    Ok(())
}

async fn run_budget_command(
    service: &LedgerService,
    session: &Session,
    cmd: &BudgetCommands,
) -> Result<()> {
    match cmd {
        BudgetCommands::Set { category, amount } => {
            let category: Category = category.parse()?;
            let amount_cents =
                parse_cents(amount).context("Invalid amount format. Use '400.00' or '400'")?;

            let budget = service
                .set_budget(session.username(), category, amount_cents)
                .await?;
            println!(
                "Budget set: {} {} per month",
                budget.category,
                format_cents(budget.amount_cents)
            );
        }

        BudgetCommands::List => {
            let budgets = service.list_budgets().await?;
            if budgets.is_empty() {
                println!("No budgets set.");
            } else {
                println!("{:<12} {:>12} {:<20}", "CATEGORY", "BUDGET", "SET BY");
                println!("{}", "-".repeat(46));
                for budget in budgets {
                    println!(
                        "{:<12} {:>12} {:<20}",
                        budget.category,
                        format_cents(budget.amount_cents),
                        truncate(&budget.username, 20)
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_report_command(
    service: &LedgerService,
    session: &Session,
    cmd: &ReportCommands,
) -> Result<()> {
    match cmd {
        ReportCommands::Categories { format } => {
            let report = service.category_report(session.username()).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("category,total,count,percentage");
                    for cat in report.data().into_iter().flatten() {
                        println!(
                            "{},{},{},{:.2}",
                            cat.category,
                            format_cents(cat.total),
                            cat.count,
                            cat.percentage
                        );
                    }
                }
                _ => print_category_table(&report),
            }
        }

        ReportCommands::Monthly { format } => {
            let report = service.monthly_report(session.username()).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("month,total,count");
                    for month in report.data().into_iter().flatten() {
                        println!(
                            "{},{},{}",
                            month.month,
                            format_cents(month.total),
                            month.count
                        );
                    }
                }
                _ => print_monthly_table(&report),
            }
        }

        ReportCommands::Budget { month, format } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let report = service
                .utilization_report(session.username(), month)
                .await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("category,budget,spent,utilization");
                    if let Some(report) = report.data() {
                        for entry in &report.entries {
                            let utilization = entry
                                .utilization
                                .percent()
                                .map(|p| format!("{:.2}", p))
                                .unwrap_or_default();
                            println!(
                                "{},{},{},{}",
                                entry.category,
                                format_cents(entry.budget),
                                format_cents(entry.spent),
                                utilization
                            );
                        }
                    }
                }
                _ => print_utilization_table(&report, month),
            }
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    session: &Session,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service, session);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_expenses_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported {} expenses and {} budgets",
                    snapshot.expenses.len(),
                    snapshot.budgets.len()
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

fn print_history(expenses: &[Expense], format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(expenses)?),
        "csv" => write_history_csv(expenses, std::io::stdout())?,
        _ => print_history_table(expenses),
    }
    Ok(())
}

fn write_history_csv<W: std::io::Write>(expenses: &[Expense], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "category", "description", "amount"])?;
    for expense in expenses {
        csv_writer.write_record([
            expense.date.format("%Y-%m-%d").to_string(),
            expense.category.to_string(),
            expense.description.clone(),
            format_cents(expense.amount_cents),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn print_history_table(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return;
    }

    println!(
        "{:<12} {:<12} {:<30} {:>12}",
        "DATE", "CATEGORY", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(69));
    for expense in expenses {
        println!(
            "{:<12} {:<12} {:<30} {:>12}",
            expense.date.format("%Y-%m-%d"),
            expense.category,
            truncate(&expense.description, 30),
            format_cents(expense.amount_cents)
        );
    }
    let total = expenses
        .iter()
        .fold(0, |acc: Cents, e| acc.saturating_add(e.amount_cents));
    println!("{}", "-".repeat(69));
    println!("{:<56} {:>12}", "TOTAL", format_cents(total));
}

fn print_category_table(report: &Report<Vec<CategoryTotal>>) {
    println!("Category Distribution");
    println!();

    let Some(categories) = report.data() else {
        println!("No category data available.");
        return;
    };

    println!(
        "{:<12} {:>12} {:>6} {:>8}  {}",
        "CATEGORY", "TOTAL", "COUNT", "PERCENT", "SHARE"
    );
    println!("{}", "-".repeat(72));
    for cat in categories {
        println!(
            "{:<12} {:>12} {:>6} {:>7.1}%  {}",
            cat.category,
            format_cents(cat.total),
            cat.count,
            cat.percentage,
            bar(cat.percentage, 30)
        );
    }
}

fn print_monthly_table(report: &Report<Vec<MonthlyTotal>>) {
    println!("Monthly Spending Trend");
    println!();

    let Some(months) = report.data() else {
        println!("Not enough data to show monthly trend.");
        return;
    };

    let peak = months.iter().map(|m| m.total).max().unwrap_or(0);
    println!("{:<8} {:>12} {:>6}  {}", "MONTH", "TOTAL", "COUNT", "TREND");
    println!("{}", "-".repeat(60));
    for month in months {
        let scaled = if peak > 0 {
            month.total as f64 / peak as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "{:<8} {:>12} {:>6}  {}",
            month.month,
            format_cents(month.total),
            month.count,
            bar(scaled, 30)
        );
    }
}

fn print_utilization_table(report: &Report<UtilizationReport>, month: Option<YearMonth>) {
    println!("Budget Utilization");
    if let Some(month) = month {
        println!("Month: {}", month);
    }
    println!();

    let Some(report) = report.data() else {
        println!("No budgets set.");
        return;
    };

    println!(
        "{:<12} {:>12} {:>12} {:>10}",
        "CATEGORY", "BUDGET", "SPENT", "USED"
    );
    println!("{}", "-".repeat(50));
    for entry in &report.entries {
        let flag = if entry.is_over(report.threshold) {
            "  OVER"
        } else {
            ""
        };
        println!(
            "{:<12} {:>12} {:>12} {:>10}{}",
            entry.category,
            format_cents(entry.budget),
            format_cents(entry.spent),
            format_utilization(&entry.utilization),
            flag
        );
    }
    println!("{}", "-".repeat(50));
    println!("Reference line: {:.0}% of budget", report.threshold);
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Dashboard for {}", dashboard.username);
    println!();

    println!("Expense History");
    println!();
    print_history_table(&dashboard.expenses);
    println!();

    if dashboard.expenses.is_empty() {
        println!("No data available for visualization.");
        return;
    }

    print_category_table(&dashboard.categories);
    println!();
    print_monthly_table(&dashboard.trend);
    println!();
    print_utilization_table(&dashboard.utilization, dashboard.month);
}

fn format_utilization(utilization: &Utilization) -> String {
    match utilization {
        Utilization::Percent(p) => format!("{:.1}%", p),
        Utilization::Undefined => "n/a".to_string(),
    }
}

/// Horizontal bar for a 0-100 value, `width` characters at 100.
fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    "#".repeat(filled)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_month(month_str: &str) -> Result<YearMonth> {
    Ok(month_str.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "pocketbook",
            "--user",
            "alice",
            "add",
            "12.50",
            "--category",
            "food",
            "-d",
            "lunch",
            "--date",
            "2024-01-05",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Commands::Add {
                amount,
                category,
                description,
                date,
            } => {
                assert_eq!(amount, "12.50");
                assert_eq!(category, "food");
                assert_eq!(description, "lunch");
                assert_eq!(date.as_deref(), Some("2024-01-05"));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_cli_parses_budget_report_month() {
        let cli = Cli::try_parse_from([
            "pocketbook",
            "report",
            "budget",
            "--month",
            "2024-02",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Report(ReportCommands::Budget { month, format }) => {
                assert_eq!(month.as_deref(), Some("2024-02"));
                assert_eq!(format, "json");
            }
            _ => panic!("expected report budget command"),
        }
    }

    #[test]
    fn test_bar_scales_and_clamps() {
        assert_eq!(bar(50.0, 10), "#####");
        assert_eq!(bar(0.0, 10), "");
        assert_eq!(bar(250.0, 10), "##########");
    }

    #[test]
    fn test_format_utilization() {
        assert_eq!(format_utilization(&Utilization::Percent(49.96)), "50.0%");
        assert_eq!(format_utilization(&Utilization::Undefined), "n/a");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("groceries", 20), "groceries");
        assert_eq!(truncate("weekly groceries at the market", 10), "weekly ...");
    }

    #[test]
    fn test_history_csv_quotes_free_text() {
        let descriptions = ["plain", "a,b", "say \"hi\"", "line one\rline two", "two\nlines"];
        let expenses: Vec<Expense> = descriptions
            .iter()
            .map(|d| {
                Expense::new(
                    "alice".to_string(),
                    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                    Category::Food,
                    d.to_string(),
                    1250,
                )
            })
            .collect();

        let mut buffer = Vec::new();
        write_history_csv(&expenses, &mut buffer).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), descriptions.len());
        for (record, description) in records.iter().zip(descriptions) {
            assert_eq!(&record[0], "2024-01-05");
            assert_eq!(&record[2], description);
            assert_eq!(&record[3], "12.50");
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["pocketbook", "history", "--format", "xml"]).is_err());
        assert!(
            Cli::try_parse_from(["pocketbook", "report", "monthly", "--format", "yaml"]).is_err()
        );
        assert!(Cli::try_parse_from(["pocketbook", "export", "--format", "table"]).is_err());
        assert!(Cli::try_parse_from(["pocketbook", "history", "--format", "csv"]).is_ok());
    }

    #[test]
    fn test_parse_date_and_month() {
        assert!(parse_date("2024-01-05").is_ok());
        assert!(parse_date("05/01/2024").is_err());
        assert_eq!(parse_month("2024-02").unwrap().to_string(), "2024-02");
        assert!(parse_month("2024/02").is_err());
    }
}
