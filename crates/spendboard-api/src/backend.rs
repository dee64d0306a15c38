//! Typed calls for each backend endpoint

use async_trait::async_trait;
use serde_json::Value;
use spendboard_core::{
    AuthResponse, BudgetRequest, BudgetStatus, Category, CategoryRequest, Expense, ExpenseRequest,
    LoginRequest, RecurringExpense, RegisterRequest, SubscriptionUpdate,
};

use crate::client::{ApiClient, Outcome, LOGIN_ENDPOINT};
use crate::error::ApiResult;

/// Operations the dashboard needs from the expense backend.
///
/// Calls that only acknowledge (messages, empty bodies) come back as raw
/// JSON values.
#[async_trait]
pub trait ExpenseBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Outcome<AuthResponse>>;
    async fn register(&self, request: &RegisterRequest) -> ApiResult<Outcome<Value>>;
    async fn delete_user(&self, user_id: i64) -> ApiResult<Outcome<Value>>;

    async fn expenses(&self, user_id: i64) -> ApiResult<Outcome<Vec<Expense>>>;
    async fn create_expense(
        &self,
        user_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Expense>>;
    async fn update_expense(
        &self,
        user_id: i64,
        expense_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Expense>>;
    async fn delete_expense(&self, user_id: i64, expense_id: i64) -> ApiResult<Outcome<Value>>;

    async fn global_categories(&self) -> ApiResult<Outcome<Vec<Category>>>;
    async fn user_categories(&self, user_id: i64) -> ApiResult<Outcome<Vec<Category>>>;
    async fn create_category(
        &self,
        user_id: i64,
        request: &CategoryRequest,
    ) -> ApiResult<Outcome<Category>>;

    async fn budget_status(&self, user_id: i64) -> ApiResult<Outcome<Vec<BudgetStatus>>>;
    async fn set_budget(&self, user_id: i64, request: &BudgetRequest)
        -> ApiResult<Outcome<Value>>;

    async fn subscriptions(&self, user_id: i64) -> ApiResult<Outcome<Vec<RecurringExpense>>>;
    async fn create_subscription(
        &self,
        user_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Value>>;
    async fn update_subscription(
        &self,
        subscription_id: i64,
        update: &SubscriptionUpdate,
    ) -> ApiResult<Outcome<Value>>;
    async fn cancel_subscription(&self, subscription_id: i64) -> ApiResult<Outcome<Value>>;
}

#[async_trait]
impl ExpenseBackend for ApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Outcome<AuthResponse>> {
        self.post(LOGIN_ENDPOINT, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<Outcome<Value>> {
        self.post("/auth/register", request).await
    }

    async fn delete_user(&self, user_id: i64) -> ApiResult<Outcome<Value>> {
        self.delete(&format!("/users/{}", user_id)).await
    }

    async fn expenses(&self, user_id: i64) -> ApiResult<Outcome<Vec<Expense>>> {
        self.get(&format!("/expenses/user/{}", user_id)).await
    }

    async fn create_expense(
        &self,
        user_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Expense>> {
        self.post(&format!("/expenses/user/{}", user_id), request)
            .await
    }

    async fn update_expense(
        &self,
        user_id: i64,
        expense_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Expense>> {
        self.put(&format!("/expenses/{}/user/{}", expense_id, user_id), request)
            .await
    }

    async fn delete_expense(&self, user_id: i64, expense_id: i64) -> ApiResult<Outcome<Value>> {
        self.delete(&format!("/expenses/{}/user/{}", expense_id, user_id))
            .await
    }

    async fn global_categories(&self) -> ApiResult<Outcome<Vec<Category>>> {
        self.get("/categories/global").await
    }

    async fn user_categories(&self, user_id: i64) -> ApiResult<Outcome<Vec<Category>>> {
        self.get(&format!("/categories/user/{}", user_id)).await
    }

    async fn create_category(
        &self,
        user_id: i64,
        request: &CategoryRequest,
    ) -> ApiResult<Outcome<Category>> {
        self.post(&format!("/categories/user/{}", user_id), request)
            .await
    }

    async fn budget_status(&self, user_id: i64) -> ApiResult<Outcome<Vec<BudgetStatus>>> {
        self.get(&format!("/expenses/budget/status/user/{}", user_id)).await
    }

    async fn set_budget(
        &self,
        user_id: i64,
        request: &BudgetRequest,
    ) -> ApiResult<Outcome<Value>> {
        self.post(&format!("/expenses/budget/user/{}", user_id), request)
            .await
    }

    async fn subscriptions(&self, user_id: i64) -> ApiResult<Outcome<Vec<RecurringExpense>>> {
        self.get(&format!("/expenses/recurring/user/{}", user_id)).await
    }

    async fn create_subscription(
        &self,
        user_id: i64,
        request: &ExpenseRequest,
    ) -> ApiResult<Outcome<Value>> {
        self.post(&format!("/expenses/recurring/user/{}", user_id), request)
            .await
    }

    async fn update_subscription(
        &self,
        subscription_id: i64,
        update: &SubscriptionUpdate,
    ) -> ApiResult<Outcome<Value>> {
        self.put(&format!("/expenses/recurring/{}", subscription_id), update)
            .await
    }

    async fn cancel_subscription(&self, subscription_id: i64) -> ApiResult<Outcome<Value>> {
        self.delete(&format!("/expenses/recurring/{}", subscription_id)).await
    }
}
