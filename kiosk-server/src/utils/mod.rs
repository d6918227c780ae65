//! Utility module - shared error, response and logging helpers
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - `{success, message}` response body
//! - logging setup

pub mod error;
pub mod logger;

pub use error::AppError;

/// Application-level Result type, used in handlers and services
pub type AppResult<T> = Result<T, AppError>;

/// API response body
///
/// ```json
/// { "success": true, "message": "Receipt printed successfully!" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse {
    pub success: bool,
    pub message: String,
}

impl AppResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
