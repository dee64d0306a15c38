//! Filter, sort and aggregate the in-memory expense list
//!
//! Everything here is pure over the expense slice: the input is never
//! mutated and no I/O happens. The only failure is a start date after the
//! end date, which is refused before anything is filtered.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult};
use crate::models::Expense;
use crate::time::DateWindow;
use crate::types::SortKey;

/// Category value that disables the category filter
pub const ALL_CATEGORIES: &str = "all";

/// User-selected filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of description or category name
    pub search_text: String,
    /// Exact category display name, or `all`
    pub category: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Calendar month 1-12; `None` means all months
    pub month: Option<u32>,
    /// Four-digit year; `None` means all years
    pub year: Option<i32>,
    /// `None` keeps the filtered order untouched
    pub sort: Option<SortKey>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: ALL_CATEGORIES.to_string(),
            start_date: None,
            end_date: None,
            month: None,
            year: None,
            sort: Some(SortKey::default()),
        }
    }
}

impl FilterCriteria {
    /// Refuse a start date after the end date.
    ///
    /// On failure the end date is cleared so the next run filters from the
    /// start date only.
    pub fn validate(&mut self) -> CoreResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                self.end_date = None;
                return Err(CoreError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Effective date window
    pub fn date_window(&self) -> DateWindow {
        DateWindow::resolve(self.start_date, self.end_date, self.month, self.year)
    }

    /// Check a single expense against every filter
    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_search(expense)
            && self.matches_category(expense)
            && self.date_window().contains(&expense.expense_date)
    }

    fn matches_search(&self, expense: &Expense) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        expense.description.to_lowercase().contains(&needle)
            || expense
                .category_name
                .as_deref()
                .map_or(false, |name| name.to_lowercase().contains(&needle))
    }

    fn matches_category(&self, expense: &Expense) -> bool {
        self.category.is_empty()
            || self.category == ALL_CATEGORIES
            || expense.category_label() == self.category
    }
}

/// Total for one category, in first-occurrence order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
}

/// Total for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// ISO date string (YYYY-MM-DD)
    pub date: String,
    pub amount: Decimal,
}

/// Aggregates over the filtered set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
    pub by_category: Vec<CategoryTotal>,
    /// Ascending by date
    pub by_day: Vec<DailyTotal>,
}

/// Filtered, sorted expenses plus their aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub expenses: Vec<Expense>,
    pub summary: Summary,
}

/// Run the whole pipeline.
///
/// Returns [`CoreError::InvalidDateRange`] (and clears `criteria.end_date`)
/// when the start date is after the end date.
pub fn run(expenses: &[Expense], criteria: &mut FilterCriteria) -> CoreResult<PipelineOutput> {
    criteria.validate()?;

    let mut filtered = filter(expenses, criteria);
    if let Some(key) = criteria.sort {
        sort_expenses(&mut filtered, key);
    }
    let summary = summarize(&filtered);

    log::debug!(
        "pipeline: {} of {} expenses kept ({})",
        filtered.len(),
        expenses.len(),
        criteria.date_window().description()
    );

    Ok(PipelineOutput {
        expenses: filtered,
        summary,
    })
}

/// Keep the expenses matching every criterion, in input order
pub fn filter(expenses: &[Expense], criteria: &FilterCriteria) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

/// Stable sort; ties keep input order
pub fn sort_expenses(expenses: &mut [Expense], key: SortKey) {
    match key {
        SortKey::DateDesc => expenses.sort_by(|a, b| b.expense_date.cmp(&a.expense_date)),
        SortKey::DateAsc => expenses.sort_by(|a, b| a.expense_date.cmp(&b.expense_date)),
        SortKey::AmountDesc => expenses.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortKey::AmountAsc => expenses.sort_by(|a, b| a.amount.cmp(&b.amount)),
    }
}

/// Total, count, per-category and per-day aggregates
pub fn summarize(expenses: &[Expense]) -> Summary {
    let mut total = Decimal::ZERO;
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut category_index: HashMap<&str, usize> = HashMap::new();
    let mut by_day: BTreeMap<String, Decimal> = BTreeMap::new();

    for expense in expenses {
        total += expense.amount;

        let label = expense.category_label();
        match category_index.get(label) {
            Some(&i) => {
                by_category[i].amount += expense.amount;
                by_category[i].count += 1;
            }
            None => {
                category_index.insert(label, by_category.len());
                by_category.push(CategoryTotal {
                    category: label.to_string(),
                    amount: expense.amount,
                    count: 1,
                });
            }
        }

        *by_day.entry(expense.date_key()).or_insert(Decimal::ZERO) += expense.amount;
    }

    Summary {
        total,
        count: expenses.len(),
        by_category,
        by_day: by_day
            .into_iter()
            .map(|(date, amount)| DailyTotal { date, amount })
            .collect(),
    }
}

// ==================== Tests ====================
