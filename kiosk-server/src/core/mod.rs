//! Core module - configuration, state, background tasks and the server
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP server
//! - [`BackgroundTasks`] - task registry with graceful shutdown

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::{Config, PrinterConfig};
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
