//! Backend access for the spendboard dashboard
//!
//! Modules:
//! - client: authenticated HTTP requests and response settling
//! - backend: one typed call per backend endpoint
//! - session: persisted token, user and theme
//! - dashboard: controller tying state, pipeline and backend together

pub mod backend;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod session;

pub use backend::ExpenseBackend;
pub use client::{extract_error_message, ApiClient, Outcome};
pub use dashboard::{AppState, Dashboard};
pub use error::{ApiError, ApiResult, DashboardError, DashboardResult};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
