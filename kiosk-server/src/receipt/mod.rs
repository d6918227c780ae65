//! Receipt formatting
//!
//! Order data in, printer directives out:
//! - [`Order`], [`LineItem`] - what was sold
//! - [`ShopProfile`] - who sold it
//! - [`ReceiptFormatter`] - layout and ESC/POS encoding

mod model;
mod renderer;
mod shop;

pub use model::{DEFAULT_CUSTOMER, LineItem, Order};
pub use renderer::{ReceiptError, ReceiptFormatter, encode, format};
pub use shop::ShopProfile;
