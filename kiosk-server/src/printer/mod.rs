//! Printer connection management
//!
//! - [`ConnectionManager`] - device lifecycle, reconnects and job serialization
//! - [`RetryPolicy`] - reconnect delay schedule

mod connection;
mod retry;

pub use connection::ConnectionManager;
pub use retry::RetryPolicy;
