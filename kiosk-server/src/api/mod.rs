//! API routes
//!
//! - [`health`] - liveness and printer connectivity
//! - [`printer`] - printer status and receipt printing

pub mod health;
pub mod middleware;
pub mod printer;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub use crate::utils::{AppResponse, AppResult};

/// Build the router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(printer::router())
}

/// Router with state and the HTTP middleware stack applied
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}
