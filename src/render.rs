//! Terminal rendering of dashboard data

use spendboard_config::{Config, Theme};
use spendboard_core::pipeline::Summary;
use spendboard_core::reports::{self, BudgetLevel, BudgetRow};
use spendboard_core::{Category, CategoryScope, Expense, RecurringExpense};
use spendboard_utils::{format_currency, format_date, truncate, CurrencyFormat};

const DESCRIPTION_WIDTH: usize = 32;
const RESET: &str = "\x1b[0m";

/// Formats dashboard data as plain text tables
pub struct Renderer {
    currency: CurrencyFormat,
    date_format: String,
    theme: Theme,
    color: bool,
}

impl Renderer {
    pub fn new(config: &Config, theme: Theme, color: bool) -> Self {
        let display = &config.display;
        Self {
            currency: CurrencyFormat {
                symbol: display.currency_symbol.clone(),
                decimal_places: display.decimal_places,
                thousands_separator: display.thousands_separator.clone(),
                decimal_separator: display.decimal_separator.clone(),
            },
            date_format: display.date_format.clone(),
            theme,
            color,
        }
    }

    fn heading(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let accent = match self.theme {
            Theme::Dark => "\x1b[1;96m",
            Theme::Light => "\x1b[1;34m",
        };
        format!("{}{}{}", accent, text, RESET)
    }

    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_currency(amount, &self.currency)
    }

    pub fn greeting(&self, name: &str) -> String {
        self.heading(&format!("Welcome back, {}", name))
    }

    /// Expense list, newest rows as ordered by the pipeline, capped at `limit`
    pub fn expenses(&self, expenses: &[Expense], limit: usize) -> String {
        if expenses.is_empty() {
            return "No expenses found.\n".to_string();
        }

        let mut out = self.heading(&format!(
            "{:>6}  {:<14} {:<32} {:<16} {:>14}",
            "ID", "Date", "Description", "Category", "Amount"
        ));
        out.push('\n');
        for expense in expenses.iter().take(limit) {
            out.push_str(&format!(
                "{:>6}  {:<14} {:<32} {:<16} {:>14}\n",
                expense.id,
                format_date(expense.expense_date, &self.date_format),
                truncate(&expense.description, DESCRIPTION_WIDTH),
                truncate(expense.category_label(), 16),
                self.money(expense.amount)
            ));
        }
        if expenses.len() > limit {
            out.push_str(&format!("... and {} more\n", expenses.len() - limit));
        }
        out
    }

    /// Totals plus the per-category breakdown
    pub fn summary(&self, summary: &Summary) -> String {
        let mut out = format!(
            "{}\nTotal spent:  {}\nTransactions: {}\n",
            self.heading("Summary"),
            self.money(summary.total),
            summary.count
        );

        let breakdown = reports::category_breakdown(summary);
        if !breakdown.is_empty() {
            out.push_str(&format!("\n{}\n", self.heading("By category")));
            for entry in breakdown {
                out.push_str(&format!(
                    "  {:<20} {:>14} {:>6.1}%  ({} items)\n",
                    truncate(&entry.category, 20),
                    self.money(entry.amount),
                    entry.percentage,
                    entry.count
                ));
            }
        }
        out
    }

    /// Daily totals in date order
    pub fn trend(&self, summary: &Summary) -> String {
        let mut out = format!("{}\n", self.heading("Daily spending"));
        for point in reports::spending_trend(summary) {
            out.push_str(&format!("  {}  {:>14}\n", point.date, self.money(point.amount)));
        }
        out
    }

    pub fn categories(&self, categories: &[Category]) -> String {
        let mut out = format!(
            "{}\n",
            self.heading(&format!("{:>6}  {:<24} {}", "ID", "Name", "Scope"))
        );
        for category in categories {
            let scope = match category.scope {
                CategoryScope::Global => "global",
                CategoryScope::User => "custom",
            };
            out.push_str(&format!("{:>6}  {:<24} {}\n", category.id, category.name, scope));
        }
        out
    }

    pub fn budgets(&self, rows: &[BudgetRow]) -> String {
        if rows.is_empty() {
            return "No budgets set.\n".to_string();
        }
        let mut out = format!(
            "{}\n",
            self.heading(&format!(
                "{:<20} {:>14} {:>14} {:>14} {:>7}  {}",
                "Category", "Limit", "Spent", "Remaining", "Used", "Status"
            ))
        );
        for row in rows {
            let status = match row.level {
                BudgetLevel::Ok => "ok",
                BudgetLevel::Warning => "warning",
                BudgetLevel::Over => "OVER BUDGET",
            };
            out.push_str(&format!(
                "{:<20} {:>14} {:>14} {:>14} {:>6.1}%  {}\n",
                truncate(&row.category, 20),
                self.money(row.limit),
                self.money(row.spent),
                self.money(row.remaining),
                row.percentage,
                status
            ));
        }
        out
    }

    pub fn subscriptions(&self, subscriptions: &[RecurringExpense]) -> String {
        if subscriptions.is_empty() {
            return "No active subscriptions.\n".to_string();
        }
        let mut out = format!(
            "{}\n",
            self.heading(&format!(
                "{:>6}  {:<28} {:<16} {:>14} {:<10} {}",
                "ID", "Description", "Category", "Amount", "Frequency", "Next due"
            ))
        );
        for subscription in subscriptions {
            out.push_str(&format!(
                "{:>6}  {:<28} {:<16} {:>14} {:<10} {}\n",
                subscription.id,
                truncate(&subscription.description, 28),
                truncate(subscription.category_label(), 16),
                self.money(subscription.amount),
                subscription.frequency,
                format_date(subscription.next_due_date, &self.date_format)
            ));
        }
        out
    }
}
