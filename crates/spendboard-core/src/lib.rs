//! Core expense processing and business logic
//!
//! - models: records exchanged with the backend
//! - pipeline: client-side filter/sort/aggregate
//! - reports: chart-ready series and budget classification
//! - export: CSV output
//! - validation: form checks run before any request is sent

pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod time;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{
    merge_categories, resolve_category_names, AuthResponse, BudgetRequest, BudgetStatus, Category,
    CategoryRequest, Expense, ExpenseRequest, LoginRequest, RecurringExpense, RegisterRequest,
    SubscriptionUpdate, UNCATEGORIZED,
};
pub use pipeline::{FilterCriteria, PipelineOutput, Summary, ALL_CATEGORIES};
pub use time::DateWindow;
pub use types::{CategoryScope, SortKey};
