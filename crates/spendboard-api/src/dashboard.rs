//! Dashboard controller
//!
//! Owns the loaded expenses, the merged category list and the current
//! filter criteria. Every mutating action validates its input first, calls
//! the backend, then reloads what changed.

use std::sync::Arc;

use log::{info, warn};
use spendboard_core::pipeline::{self, PipelineOutput};
use spendboard_core::validation::{
    validate_budget, validate_category_name, validate_expense, validate_expense_update,
    validate_subscription_update,
};
use spendboard_core::{
    merge_categories, resolve_category_names, BudgetRequest, BudgetStatus, Category,
    CategoryRequest, CoreError, Expense, ExpenseRequest, FilterCriteria, LoginRequest,
    RecurringExpense, RegisterRequest, SubscriptionUpdate,
};
use spendboard_config::Theme;

use crate::backend::ExpenseBackend;
use crate::client::Outcome;
use crate::error::{ApiError, DashboardError, DashboardResult};
use crate::session::{Session, SessionStore};

/// Everything the dashboard has fetched so far
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
    pub budgets: Vec<BudgetStatus>,
    pub subscriptions: Vec<RecurringExpense>,
    pub criteria: FilterCriteria,
    pub loaded: bool,
}

pub struct Dashboard {
    backend: Arc<dyn ExpenseBackend>,
    session: Arc<dyn SessionStore>,
    state: AppState,
}

/// Turn a settled outcome into its payload, or stop on a rejected session
fn settle<T>(outcome: Outcome<T>) -> DashboardResult<Option<T>> {
    match outcome {
        Outcome::Data(data) => Ok(Some(data)),
        Outcome::NoContent => Ok(None),
        Outcome::LoginRequired => Err(DashboardError::LoginRequired),
    }
}

impl Dashboard {
    pub fn new(backend: Arc<dyn ExpenseBackend>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            session,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> Session {
        self.session.load()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.state.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.state.criteria = criteria;
    }

    fn user_id(&self) -> DashboardResult<i64> {
        let session = self.session.load();
        match (session.token, session.user_id) {
            (Some(_), Some(user_id)) => Ok(user_id),
            _ => Err(DashboardError::LoginRequired),
        }
    }

    /// A vanished account ends the session; other errors pass through
    fn escalate(&self, error: ApiError) -> DashboardError {
        if error.is_user_missing() {
            warn!("account no longer exists, logging out");
            if let Err(e) = self.session.clear() {
                warn!("failed to clear session: {}", e);
            }
            return DashboardError::ForcedLogout {
                message: error.to_string(),
            };
        }
        error.into()
    }

    /// Fetch expenses and both category lists concurrently, then resolve
    /// category names on the expenses.
    pub async fn load(&mut self) -> DashboardResult<()> {
        let user_id = self.user_id()?;

        let fetched = tokio::try_join!(
            self.backend.expenses(user_id),
            self.backend.global_categories(),
            self.backend.user_categories(user_id),
        );
        let (expenses, global, user) = fetched.map_err(|e| self.escalate(e))?;

        let mut expenses = settle(expenses)?.unwrap_or_default();
        let categories = merge_categories(
            settle(global)?.unwrap_or_default(),
            settle(user)?.unwrap_or_default(),
        );
        resolve_category_names(&mut expenses, &categories);

        info!(
            "loaded {} expenses and {} categories",
            expenses.len(),
            categories.len()
        );
        self.state.expenses = expenses;
        self.state.categories = categories;
        self.state.loaded = true;
        Ok(())
    }

    async fn ensure_loaded(&mut self) -> DashboardResult<()> {
        if !self.state.loaded {
            self.load().await?;
        }
        Ok(())
    }

    /// Run the filter/sort/aggregate pipeline over the loaded expenses.
    ///
    /// An inverted date range clears the end date in the stored criteria
    /// and is reported as an error.
    pub fn view(&mut self) -> DashboardResult<PipelineOutput> {
        Ok(pipeline::run(
            &self.state.expenses,
            &mut self.state.criteria,
        )?)
    }

    pub async fn refresh_budgets(&mut self) -> DashboardResult<&[BudgetStatus]> {
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .budget_status(user_id)
            .await
            .map_err(|e| self.escalate(e))?;
        self.state.budgets = settle(outcome)?.unwrap_or_default();
        Ok(self.state.budgets.as_slice())
    }

    pub async fn refresh_subscriptions(&mut self) -> DashboardResult<&[RecurringExpense]> {
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .subscriptions(user_id)
            .await
            .map_err(|e| self.escalate(e))?;
        self.state.subscriptions = settle(outcome)?.unwrap_or_default();
        Ok(self.state.subscriptions.as_slice())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> DashboardResult<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = settle(self.backend.login(&request).await?)?.ok_or_else(|| {
            DashboardError::EmptyResponse {
                operation: "login".to_string(),
            }
        })?;

        let session = Session {
            token: Some(auth.token),
            user_id: Some(auth.user_id),
            user_name: auth.name,
            theme: self.session.load().theme,
        };
        self.session.save(&session)?;
        self.state = AppState {
            criteria: self.state.criteria.clone(),
            ..AppState::default()
        };
        info!("logged in as user {}", auth.user_id);
        Ok(session)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> DashboardResult<()> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
            return Err(CoreError::validation("Name, email and password are required").into());
        }
        if !request.email.contains('@') {
            return Err(CoreError::validation("Please enter a valid email address").into());
        }
        settle(self.backend.register(&request).await?)?;
        info!("registered {}", request.email);
        Ok(())
    }

    pub fn logout(&mut self) -> DashboardResult<()> {
        self.session.clear()?;
        self.state = AppState::default();
        info!("logged out");
        Ok(())
    }

    pub fn set_theme(&self, theme: Theme) -> DashboardResult<()> {
        let mut session = self.session.load();
        session.theme = Some(theme);
        self.session.save(&session)?;
        Ok(())
    }

    pub async fn add_expense(&mut self, request: &ExpenseRequest) -> DashboardResult<()> {
        validate_expense(request)?;
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .create_expense(user_id, request)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.load().await
    }

    pub async fn update_expense(
        &mut self,
        expense_id: i64,
        request: &ExpenseRequest,
    ) -> DashboardResult<()> {
        validate_expense_update(request)?;
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .update_expense(user_id, expense_id, request)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.load().await
    }

    pub async fn delete_expense(&mut self, expense_id: i64) -> DashboardResult<()> {
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .delete_expense(user_id, expense_id)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.load().await
    }

    /// Create a user category; the name must not clash with any loaded one
    pub async fn add_category(&mut self, name: &str) -> DashboardResult<Option<Category>> {
        self.ensure_loaded().await?;
        let name = validate_category_name(name, &self.state.categories)?;
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .create_category(user_id, &CategoryRequest { name })
            .await
            .map_err(|e| self.escalate(e))?;
        let created = settle(outcome)?;
        self.load().await?;
        Ok(created)
    }

    pub async fn set_budget(&mut self, request: &BudgetRequest) -> DashboardResult<()> {
        validate_budget(request)?;
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .set_budget(user_id, request)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.refresh_budgets().await?;
        Ok(())
    }

    /// Create a subscription. The backend books its first payment as an
    /// expense, so expenses are reloaded too.
    pub async fn add_subscription(&mut self, request: &ExpenseRequest) -> DashboardResult<()> {
        validate_expense(request)?;
        let user_id = self.user_id()?;
        let outcome = self
            .backend
            .create_subscription(user_id, request)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.load().await?;
        self.refresh_subscriptions().await?;
        Ok(())
    }

    pub async fn update_subscription(
        &mut self,
        subscription_id: i64,
        update: &SubscriptionUpdate,
    ) -> DashboardResult<()> {
        validate_subscription_update(update)?;
        self.user_id()?;
        let outcome = self
            .backend
            .update_subscription(subscription_id, update)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.refresh_subscriptions().await?;
        Ok(())
    }

    pub async fn cancel_subscription(&mut self, subscription_id: i64) -> DashboardResult<()> {
        self.user_id()?;
        let outcome = self
            .backend
            .cancel_subscription(subscription_id)
            .await
            .map_err(|e| self.escalate(e))?;
        settle(outcome)?;
        self.refresh_subscriptions().await?;
        Ok(())
    }

    /// Delete the account and forget the session
    pub async fn delete_account(&mut self) -> DashboardResult<()> {
        let user_id = self.user_id()?;
        let outcome = self.backend.delete_user(user_id).await?;
        settle(outcome)?;
        self.logout()
    }
}
