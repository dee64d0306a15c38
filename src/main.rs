//! spendboard main entry point

mod render;

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rust_decimal::Decimal;
use spendboard_api::{ApiClient, Dashboard, DashboardError, FileSessionStore, SessionStore};
use spendboard_config::{Config, ConfigError, Theme};
use spendboard_core::time::{parse_month_selector, parse_year_selector};
use spendboard_core::{
    export, reports, BudgetRequest, Category, CoreError, Expense, ExpenseRequest, FilterCriteria,
    SortKey, SubscriptionUpdate, ALL_CATEGORIES,
};
use tokio::runtime::Runtime;

use crate::render::Renderer;

#[derive(Parser, Debug)]
#[command(name = "spendboard")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal finance dashboard", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Dashboard(DashboardCommand),
}

/// Commands that talk to the backend
#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show filtered expenses with a summary
    Show {
        #[command(flatten)]
        filter: FilterArgs,
        /// Maximum rows to list
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print chart data as JSON
    Chart {
        #[arg(long, value_enum, default_value_t = ChartKind::Category)]
        kind: ChartKind,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export filtered expenses as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Add an expense
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
        /// Category name or id
        #[arg(long)]
        category: String,
        /// Expense date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Edit an expense; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an expense
    Delete { id: i64 },
    /// List categories
    Categories,
    /// Create a custom category
    CategoryAdd { name: String },
    /// Budget status and limits
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },
    /// Recurring subscriptions
    Subs {
        #[command(subcommand)]
        action: SubsAction,
    },
    /// Show, set or toggle the theme
    Theme { value: Option<String> },
    /// Delete the account and all its data
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetAction {
    Status,
    Set {
        /// Category name or id
        #[arg(long)]
        category: String,
        #[arg(long)]
        limit: Decimal,
    },
}

#[derive(Subcommand, Debug)]
enum SubsAction {
    List,
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        category: String,
        /// First payment date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        next_due: Option<NaiveDate>,
    },
    Cancel { id: i64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartKind {
    Category,
    Trend,
}

/// Filter options shared by the listing commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive text matched against description and category
    #[arg(long)]
    search: Option<String>,
    /// Category name, or "all"
    #[arg(long)]
    category: Option<String>,
    /// Range start (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Month number or "all"; ignored when a range is given
    #[arg(long)]
    month: Option<String>,
    /// Year or "all"; ignored when a range is given
    #[arg(long)]
    year: Option<String>,
    /// date-desc, date-asc, amount-desc or amount-asc
    #[arg(long)]
    sort: Option<String>,
}

impl FilterArgs {
    fn into_criteria(self, default_sort: &str) -> anyhow::Result<FilterCriteria> {
        let sort_text = self.sort.as_deref().unwrap_or(default_sort);
        let sort = SortKey::lenient(sort_text);
        if sort.is_none() {
            warn!("unknown sort key '{}', keeping filtered order", sort_text);
        }

        Ok(FilterCriteria {
            search_text: self.search.unwrap_or_default(),
            category: self.category.unwrap_or_else(|| ALL_CATEGORIES.to_string()),
            start_date: self.from,
            end_date: self.to,
            month: parse_month_selector(self.month.as_deref().unwrap_or_default())
                .map_err(|e| anyhow!(e))?,
            year: parse_year_selector(self.year.as_deref().unwrap_or_default())
                .map_err(|e| anyhow!(e))?,
            sort,
        })
    }
}

fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", describe(&error));
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Command::InitConfig { force } => return init_config(&cli.config, force),
        Command::Dashboard(command) => command,
    };

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    init_logging(&config.logging.level);
    info!("config loaded, backend at {}", config.api.base_url);

    let color = !cli.no_color && io::stdout().is_terminal();
    let rt = Runtime::new()?;
    rt.block_on(run(command, config, color))
}

/// Error text for the terminal, with code and hints when the cause carries them
fn describe(error: &anyhow::Error) -> String {
    for cause in error.chain() {
        let core = match cause.downcast_ref::<DashboardError>() {
            Some(DashboardError::Core(core)) => Some(core),
            _ => cause.downcast_ref::<CoreError>(),
        };
        if let Some(core) = core {
            return format!("{}: {}", core.severity(), core.to_details());
        }
        if let Some(config) = cause.downcast_ref::<ConfigError>() {
            let mut text = format!("error: [{}] {:#}", config.code(), error);
            let suggestions = config.suggestions();
            if !suggestions.is_empty() {
                text.push_str("\nSuggestions:");
                for suggestion in suggestions {
                    text.push_str(&format!("\n  - {}", suggestion));
                }
            }
            return text;
        }
    }
    format!("error: {:#}", error)
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(path, Config::generate_default())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn run(command: DashboardCommand, config: Config, color: bool) -> anyhow::Result<()> {
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session.path.clone()));
    let client = ApiClient::new(config.api.clone(), session.clone())?;
    let mut dashboard = Dashboard::new(Arc::new(client), session.clone());

    let theme = session.load().theme.unwrap_or(config.display.theme);
    let renderer = Renderer::new(&config, theme, color);

    match command {
        DashboardCommand::Login { email, password } => {
            let session = dashboard.login(&email, &password).await?;
            println!("{}", renderer.greeting(session.display_name()));
        }
        DashboardCommand::Register {
            name,
            email,
            password,
        } => {
            dashboard.register(&name, &email, &password).await?;
            println!("Registration successful. Please log in.");
        }
        DashboardCommand::Logout => {
            dashboard.logout()?;
            println!("Logged out.");
        }
        DashboardCommand::Show { filter, limit } => {
            dashboard.set_criteria(filter.into_criteria(&config.dashboard.default_sort)?);
            dashboard.load().await?;
            let output = dashboard.view()?;

            println!("{}", renderer.greeting(dashboard.session().display_name()));
            println!("{}", dashboard.criteria().date_window().description());
            println!();
            print!(
                "{}",
                renderer.expenses(&output.expenses, limit.unwrap_or(config.dashboard.list_limit))
            );
            println!();
            print!("{}", renderer.summary(&output.summary));
            if !output.summary.by_day.is_empty() {
                println!();
                print!("{}", renderer.trend(&output.summary));
            }
        }
        DashboardCommand::Chart { kind, filter } => {
            dashboard.set_criteria(filter.into_criteria(&config.dashboard.default_sort)?);
            dashboard.load().await?;
            let output = dashboard.view()?;
            let chart = match kind {
                ChartKind::Category => reports::category_chart(&output.summary),
                ChartKind::Trend => reports::trend_chart(&output.summary),
            };
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        DashboardCommand::Export { output, filter } => {
            dashboard.set_criteria(filter.into_criteria(&config.dashboard.default_sort)?);
            dashboard.load().await?;
            let view = dashboard.view()?;
            let delimiter = u8::try_from(config.export.delimiter)
                .map_err(|_| anyhow!("export delimiter must be a single-byte character"))?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    export::write_csv(&view.expenses, file, delimiter)?;
                    println!("Exported {} expenses to {}", view.expenses.len(), path.display());
                }
                None => export::write_csv(&view.expenses, io::stdout().lock(), delimiter)?,
            }
        }
        DashboardCommand::Add {
            description,
            amount,
            category,
            date,
        } => {
            dashboard.load().await?;
            let category_id = resolve_category(&dashboard.state().categories, &category)?;
            let request = ExpenseRequest {
                description,
                amount,
                expense_date: date.unwrap_or_else(today),
                category_id: Some(category_id),
            };
            dashboard.add_expense(&request).await?;
            println!("Expense added.");
        }
        DashboardCommand::Edit {
            id,
            description,
            amount,
            category,
            date,
        } => {
            dashboard.load().await?;
            let state = dashboard.state();
            let existing = state
                .expenses
                .iter()
                .find(|e| e.id == id)
                .ok_or_else(|| anyhow!("No expense with id {}", id))?;
            let category_id = category
                .map(|value| resolve_category(&state.categories, &value))
                .transpose()?;
            let request = merge_edit(existing, description, amount, date, category_id);
            dashboard.update_expense(id, &request).await?;
            println!("Expense {} updated.", id);
        }
        DashboardCommand::Delete { id } => {
            dashboard.delete_expense(id).await?;
            println!("Expense {} deleted.", id);
        }
        DashboardCommand::Categories => {
            dashboard.load().await?;
            print!("{}", renderer.categories(&dashboard.state().categories));
        }
        DashboardCommand::CategoryAdd { name } => {
            let created = dashboard.add_category(&name).await?;
            match created {
                Some(category) => println!("Category '{}' created (id {}).", category.name, category.id),
                None => println!("Category created."),
            }
        }
        DashboardCommand::Budget { action } => match action {
            BudgetAction::Status => {
                let statuses = dashboard.refresh_budgets().await?.to_vec();
                let rows = reports::budget_rows(&statuses, config.dashboard.budget_warning_percent);
                print!("{}", renderer.budgets(&rows));
            }
            BudgetAction::Set { category, limit } => {
                dashboard.load().await?;
                let category_id = resolve_category(&dashboard.state().categories, &category)?;
                dashboard
                    .set_budget(&BudgetRequest {
                        category_id,
                        limit_amount: limit,
                    })
                    .await?;
                println!("Budget saved.");
            }
        },
        DashboardCommand::Subs { action } => match action {
            SubsAction::List => {
                let subscriptions = dashboard.refresh_subscriptions().await?;
                print!("{}", renderer.subscriptions(subscriptions));
            }
            SubsAction::Add {
                description,
                amount,
                category,
                start,
            } => {
                dashboard.load().await?;
                let category_id = resolve_category(&dashboard.state().categories, &category)?;
                let request = ExpenseRequest {
                    description,
                    amount,
                    expense_date: start.unwrap_or_else(today),
                    category_id: Some(category_id),
                };
                dashboard.add_subscription(&request).await?;
                println!("Subscription added.");
            }
            SubsAction::Edit {
                id,
                description,
                amount,
                next_due,
            } => {
                let update = SubscriptionUpdate {
                    amount,
                    description,
                    next_due_date: next_due,
                };
                dashboard.update_subscription(id, &update).await?;
                println!("Subscription {} updated.", id);
            }
            SubsAction::Cancel { id } => {
                dashboard.cancel_subscription(id).await?;
                println!("Subscription {} cancelled.", id);
            }
        },
        DashboardCommand::Theme { value } => {
            let next = match value.as_deref() {
                None => {
                    println!("{}", theme);
                    return Ok(());
                }
                Some("toggle") => theme.toggled(),
                Some(other) => other.parse::<Theme>().map_err(|e| anyhow!(e))?,
            };
            dashboard.set_theme(next)?;
            println!("Theme set to {}.", next);
        }
        DashboardCommand::DeleteAccount { yes } => {
            if !yes {
                bail!("This permanently deletes your account. Re-run with --yes to confirm.");
            }
            dashboard.delete_account().await?;
            println!("Account deleted.");
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Find a loaded category by id or case-insensitive name
fn resolve_category(categories: &[Category], value: &str) -> anyhow::Result<i64> {
    let value = value.trim();
    if let Ok(id) = value.parse::<i64>() {
        if categories.iter().any(|c| c.id == id) {
            return Ok(id);
        }
    }
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(value))
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Unknown category '{}'", value))
}

/// Request for an edit; omitted fields keep the expense's current value
fn merge_edit(
    existing: &Expense,
    description: Option<String>,
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    category_id: Option<i64>,
) -> ExpenseRequest {
    ExpenseRequest {
        description: description.unwrap_or_else(|| existing.description.clone()),
        amount: amount.unwrap_or(existing.amount),
        expense_date: date.unwrap_or(existing.expense_date),
        category_id: category_id.or(existing.category_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendboard_core::CategoryScope;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Food".to_string(),
                scope: CategoryScope::Global,
            },
            Category {
                id: 7,
                name: "2024".to_string(),
                scope: CategoryScope::User,
            },
        ]
    }

    fn expense() -> Expense {
        Expense {
            id: 3,
            description: "Lunch".to_string(),
            amount: Decimal::from(250),
            expense_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            category_id: Some(1),
            category_name: Some("Food".to_string()),
            recurring: None,
        }
    }

    #[test]
    fn test_resolve_category_by_id() {
        assert_eq!(resolve_category(&categories(), "1").unwrap(), 1);
        assert_eq!(resolve_category(&categories(), " 7 ").unwrap(), 7);
    }

    #[test]
    fn test_resolve_category_by_name_ignores_case() {
        assert_eq!(resolve_category(&categories(), "food").unwrap(), 1);
        assert_eq!(resolve_category(&categories(), "FOOD").unwrap(), 1);
    }

    #[test]
    fn test_resolve_category_numeric_name_and_unknown() {
        // 2024 is not an id, so it falls back to the name
        assert_eq!(resolve_category(&categories(), "2024").unwrap(), 7);

        let err = resolve_category(&categories(), "Travel").unwrap_err();
        assert_eq!(err.to_string(), "Unknown category 'Travel'");
        assert!(resolve_category(&categories(), "99").is_err());
    }

    #[test]
    fn test_edit_keeps_omitted_fields() {
        let existing = expense();
        let request = merge_edit(&existing, None, Some(Decimal::from(300)), None, None);
        assert_eq!(request.description, "Lunch");
        assert_eq!(request.amount, Decimal::from(300));
        assert_eq!(request.expense_date, existing.expense_date);
        assert_eq!(request.category_id, Some(1));
    }

    #[test]
    fn test_edit_replaces_given_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let request = merge_edit(&expense(), Some("Dinner".to_string()), None, Some(date), Some(7));
        assert_eq!(request.description, "Dinner");
        assert_eq!(request.amount, Decimal::from(250));
        assert_eq!(request.expense_date, date);
        assert_eq!(request.category_id, Some(7));
    }

    #[test]
    fn test_describe_shows_code_and_suggestions() {
        let error = anyhow::Error::from(DashboardError::Core(CoreError::DuplicateCategory {
            name: "Food".to_string(),
        }));
        let text = describe(&error);
        assert!(text.starts_with("warning: [DUPLICATE_ENTRY] Category already exists: Food"));
        assert!(text.contains("\nSuggestions:\n  - Select the existing 'Food' category"));
    }

    #[test]
    fn test_describe_config_error_lists_hints() {
        let error = anyhow::Error::from(ConfigError::InvalidValue {
            field: "display.date_format".to_string(),
            reason: "Unsupported date format: %Q".to_string(),
        })
        .context("Failed to load configuration from config.yaml");
        let text = describe(&error);
        assert!(text.starts_with("error: [INVALID_VALUE] Failed to load configuration from config.yaml: "));
        assert!(text.ends_with("\nSuggestions:\n  - Unsupported date format: %Q"));
    }

    #[test]
    fn test_describe_plain_error() {
        let error = anyhow!("No expense with id 9");
        assert_eq!(describe(&error), "error: No expense with id 9");
    }
}
