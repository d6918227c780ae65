//! Printer API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /printer-status | GET | last known connectivity |
//! | /printer-online | GET | probe the device, schedule reconnect on failure |
//! | /print | POST | print one receipt |

pub mod dto;
mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/printer-status", get(handler::status))
        .route("/printer-online", get(handler::online))
        .route("/print", post(handler::print))
}
