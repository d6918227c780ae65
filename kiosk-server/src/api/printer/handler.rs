//! Printer API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info, warn};

use super::dto::{PrintRequest, PrinterStatusResponse};
use crate::core::ServerState;
use crate::receipt::Order;
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /printer-status - last known connectivity, no device I/O
pub async fn status(State(state): State<ServerState>) -> Json<PrinterStatusResponse> {
    Json(PrinterStatusResponse::from_connected(state.printer.is_connected()))
}

/// GET /printer-online - probe the device now
///
/// An offline printer is reported in the body (status 200) and a background
/// reconnect is scheduled.
pub async fn online(State(state): State<ServerState>) -> Json<AppResponse> {
    if state.printer.check_online().await {
        Json(AppResponse::success("Printer is online"))
    } else {
        Json(AppResponse::failure("Printer offline"))
    }
}

/// POST /print - format and print one receipt
pub async fn print(
    State(state): State<ServerState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> AppResult<Json<AppResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected print request body");
        AppError::validation(rejection.body_text())
    })?;
    debug!(?request, "Print request received");

    let order = Order::from(request);
    let data = state.receipts.render(&order)?;

    state.printer.print(&data).await?;

    info!(
        invoice = %order.invoice_number,
        items = order.items.len(),
        "✅ Receipt printed successfully!"
    );
    Ok(Json(AppResponse::success("Receipt printed successfully!")))
}
