//! # kiosk-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command vocabulary and byte building
//! - Windows-1252 encoding for single-byte printers
//! - Fixed-width table layout
//! - USB printing (bulk OUT endpoint)
//! - Image/logo processing
//!
//! Business logic (WHAT to print) stays in application code:
//! - Receipt layout → kiosk-server
//!
//! ## Example
//!
//! ```ignore
//! use kiosk_printer::{Command, EscPosBuilder, Justify, Printer, UsbId, UsbPrinter};
//!
//! let data = EscPosBuilder::from_commands(&[
//!     Command::Justify(Justify::Center),
//!     Command::Line("Hello".into()),
//!     Command::Feed(4),
//!     Command::Cut,
//! ]);
//!
//! let printer = UsbPrinter::new(UsbId::new(0x1fc9, 0x2016));
//! printer.open().await?;
//! printer.write(&data).await?;
//! printer.close().await;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;
mod table;

// Re-exports
pub use encoding::{WPC1252_CODE_PAGE, encode_text, pad_text, text_width, truncate_text};
pub use error::{PrintError, PrintResult};
pub use escpos::{Command, EscPosBuilder, Justify, TextSize};
pub use printer::{Printer, UsbId, UsbPrinter};
pub use table::{Align, Column, Table};

#[cfg(feature = "image")]
pub use escpos::{process_logo, rasterize};
