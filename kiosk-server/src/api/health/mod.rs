//! Health check route
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "device": "1fc9:2016", "printerConnected": false }
//! ```
//!
//! The server is healthy even while the printer is absent; connectivity is
//! reported alongside.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Configured USB vendor:product pair
    device: String,
    printer_connected: bool,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        device: state.config.printer.usb_id().to_string(),
        printer_connected: state.printer.is_connected(),
    })
}
