//! Error types for spendboard-api

use spendboard_core::CoreError;
use thiserror::Error;

/// Message used when the backend gives nothing better
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response; `message` is what the backend said, best effort
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Could not reach the server: {message}")]
    Network { message: String },

    #[error("Unexpected response format: {message}")]
    Decode { message: String },

    #[error("HTTP client setup failed: {message}")]
    Configuration { message: String },

    #[error("Session storage error: {message}")]
    Session { message: String },
}

impl ApiError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The account behind the session no longer exists.
    ///
    /// The backend only says so in the message text.
    pub fn is_user_missing(&self) -> bool {
        match self {
            ApiError::Http { message, .. } => message.to_lowercase().contains("user not found"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode {
                message: error.to_string(),
            }
        } else {
            ApiError::Network {
                message: error.to_string(),
            }
        }
    }
}

/// Result type with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the dashboard controller
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No usable session; the user has to log in again
    #[error("Session expired. Please log in again.")]
    LoginRequired,

    /// The account vanished while reloading; the session was cleared
    #[error("Your account could not be found ({message}). You have been logged out.")]
    ForcedLogout { message: String },

    #[error("Unexpected empty response from {operation}")]
    EmptyResponse { operation: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type with DashboardError
pub type DashboardResult<T> = Result<T, DashboardError>;
