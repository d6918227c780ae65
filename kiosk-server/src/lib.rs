//! Kiosk Server - local receipt printing service
//!
//! # Overview
//!
//! A small HTTP service sitting next to a point-of-sale till. It owns one USB
//! thermal printer and offers:
//!
//! - **Connection management** (`printer`): open at startup, retry in the
//!   background, serialize print jobs
//! - **Receipt formatting** (`receipt`): order data to ESC/POS bytes
//! - **HTTP API** (`api`): status, online probe, print, health
//!
//! # Module layout
//!
//! ```text
//! kiosk-server/src/
//! ├── core/          # config, state, background tasks, server
//! ├── printer/       # connection manager, retry policy
//! ├── receipt/       # order model, shop profile, layout
//! ├── api/           # routes, handlers, middleware
//! └── utils/         # errors, responses, logging
//! ```

pub mod api;
pub mod core;
pub mod printer;
pub mod receipt;
pub mod utils;

// Re-exports
pub use core::{BackgroundTasks, Config, Server, ServerState};
pub use printer::{ConnectionManager, RetryPolicy};
pub use receipt::{LineItem, Order, ReceiptError, ReceiptFormatter, ShopProfile};
pub use utils::{AppError, AppResponse, AppResult};
pub use utils::logger::init_logger_with_file;

/// Load `.env`, read configuration and start logging
///
/// `.env` is optional; real environment variables win over it.
pub fn setup_environment() -> Config {
    let dotenv = dotenvy::dotenv();
    let config = Config::from_env();

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read .env"),
    }

    config
}

pub fn print_banner() {
    println!(
        r#"
    __ __ _             __
   / //_/(_)___  _____/ /__
  / ,<  / / __ \/ ___/ //_/
 / /| |/ / /_/ (__  ) ,<
/_/ |_/_/\____/____/_/|_|
        receipt printer
    "#
    );
}
