//! Unified error handling
//!
//! - [`AppError`] - application error enum, rendered as `{success:false, message}`
//!
//! Hardware errors never leak their detail to the client: the detail is
//! logged and the response carries a fixed message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::AppResponse;
use crate::receipt::ReceiptError;

/// Application error enum
///
/// | Variant | Status | Body message |
/// |---------|--------|--------------|
/// | Validation | 400 | passed through |
/// | Connection | 500 | "Printer connection error" |
/// | Print | 500 | "Printing error" |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request rejected before touching the printer (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Device could not be opened (500)
    #[error("Printer connection failed: {0}")]
    Connection(String),

    /// Failure while sending commands (500)
    #[error("Printing failed: {0}")]
    Print(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Connection(_) | AppError::Print(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Connection(detail) => {
                error!(target: "printer", error = %detail, "❌ Printer connection failed");
                "Printer connection error".to_string()
            }
            AppError::Print(detail) => {
                error!(target: "printer", error = %detail, "❌ Error printing receipt");
                "Printing error".to_string()
            }
        };

        (self.status(), Json(AppResponse::failure(message))).into_response()
    }
}

impl From<ReceiptError> for AppError {
    fn from(e: ReceiptError) -> Self {
        match e {
            ReceiptError::EmptyOrder => AppError::Validation("Cart is empty".to_string()),
        }
    }
}
