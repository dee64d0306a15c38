//! Form checks run before any request is sent

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::models::{BudgetRequest, Category, ExpenseRequest, SubscriptionUpdate};

/// Check a new expense (or subscription) form; a category is required
pub fn validate_expense(request: &ExpenseRequest) -> CoreResult<()> {
    validate_expense_update(request)?;
    if request.category_id.is_none() {
        return Err(CoreError::validation("Please select a category"));
    }
    Ok(())
}

/// Check an edited expense. The category may stay empty.
pub fn validate_expense_update(request: &ExpenseRequest) -> CoreResult<()> {
    if request.description.trim().is_empty() {
        return Err(CoreError::validation("Description is required"));
    }
    validate_amount(request.amount)
}

/// Check a partial subscription update
pub fn validate_subscription_update(update: &SubscriptionUpdate) -> CoreResult<()> {
    if update.is_empty() {
        return Err(CoreError::validation("Nothing to update"));
    }
    if let Some(description) = &update.description {
        if description.trim().is_empty() {
            return Err(CoreError::validation("Description is required"));
        }
    }
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }
    Ok(())
}

/// Check a new category name against the merged category list.
///
/// Returns the trimmed name to send.
pub fn validate_category_name(name: &str, existing: &[Category]) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("Category name is required"));
    }
    if existing.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
        return Err(CoreError::DuplicateCategory {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Check a budget limit
pub fn validate_budget(request: &BudgetRequest) -> CoreResult<()> {
    if request.limit_amount <= Decimal::ZERO {
        return Err(CoreError::validation("Budget limit must be a positive number"));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("Amount must be greater than zero"));
    }
    Ok(())
}
