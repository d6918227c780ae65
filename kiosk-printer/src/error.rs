//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// No USB device matches the configured vendor/product pair
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// libusb reported an error
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// The device exposes no bulk OUT endpoint to write to
    #[error("No bulk OUT endpoint on device {0}")]
    NoEndpoint(String),

    /// Write attempted before the device was opened
    #[error("Device not open: {0}")]
    NotOpen(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
