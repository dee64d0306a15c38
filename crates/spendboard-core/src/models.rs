//! Records exchanged with the backend

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::types::CategoryScope;

/// Display label for expenses without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single dated spending record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Server-assigned identifier
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Set when the record was generated from a subscription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl Expense {
    /// Category name shown to the user
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// ISO date string (YYYY-MM-DD)
    pub fn date_key(&self) -> String {
        self.expense_date.format("%Y-%m-%d").to_string()
    }
}

/// Expense label, global or user-defined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Filled in from the endpoint the category was fetched from
    #[serde(skip)]
    pub scope: CategoryScope,
}

/// Merge global and user categories into one list without duplicate ids.
///
/// Global categories come first; the first occurrence of an id wins.
pub fn merge_categories(global: Vec<Category>, user: Vec<Category>) -> Vec<Category> {
    let mut seen = HashSet::new();
    let tagged_global = global.into_iter().map(|mut c| {
        c.scope = CategoryScope::Global;
        c
    });
    let tagged_user = user.into_iter().map(|mut c| {
        c.scope = CategoryScope::User;
        c
    });

    tagged_global
        .chain(tagged_user)
        .filter(|c| seen.insert(c.id))
        .collect()
}

/// Fill `category_name` on expenses that only carry a `category_id`
pub fn resolve_category_names(expenses: &mut [Expense], categories: &[Category]) {
    let names: HashMap<i64, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    for expense in expenses.iter_mut().filter(|e| e.category_name.is_none()) {
        if let Some(name) = expense.category_id.and_then(|id| names.get(&id)) {
            expense.category_name = Some(name.to_string());
        }
    }
}

/// Spend-to-date against a configured limit, computed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category_name: String,
    pub limit: Decimal,
    pub spent: Decimal,
    /// spent / limit * 100
    pub percentage: f64,
}

/// Expense template the server materializes on a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub category_name: Option<String>,
}

fn default_frequency() -> String {
    "MONTHLY".to_string()
}

impl RecurringExpense {
    /// Category name shown to the user
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

// ==================== Request payloads ====================

/// Body for creating or editing an expense (also used for subscriptions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub category_id: Option<i64>,
}

/// Partial subscription update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
}

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.next_due_date.is_none()
    }
}

/// Body for creating a user category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// Body for setting a category budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub category_id: i64,
    pub limit_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    #[serde(default)]
    pub name: Option<String>,
}
