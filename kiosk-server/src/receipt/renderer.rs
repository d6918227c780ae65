//! Sales receipt renderer
//!
//! Lays an [`Order`] out as printer directives for a monospace receipt
//! printer, then encodes them into ESC/POS bytes.

use kiosk_printer::{Column, Command, EscPosBuilder, Justify, Table, pad_text, text_width};
use rust_decimal::{Decimal, RoundingStrategy};

use super::model::{LineItem, Order};
use super::shop::ShopProfile;

/// Width of the label field in the totals block
const TOTALS_LABEL_WIDTH: usize = 20;

/// Item names are cut to this many characters before the table sees them
const ITEM_NAME_MAX: usize = 15;

/// Lines fed before the cut
const TAIL_FEED: u8 = 4;

/// DESCRIPTION / QTY / PRICE / AMOUNT
const ITEM_COLUMNS: [Column; 4] = [
    Column::left(0.40),
    Column::left(0.12),
    Column::right(0.20),
    Column::right(0.25),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptError {
    #[error("order has no items")]
    EmptyOrder,
}

/// Lay out an order as printer directives
///
/// Fails before producing anything when the order has no items.
pub fn format(order: &Order, shop: &ShopProfile, width: usize) -> Result<Vec<Command>, ReceiptError> {
    if order.items.is_empty() {
        return Err(ReceiptError::EmptyOrder);
    }

    let mut layout = Layout::new(shop, width);
    layout.header();
    layout.banner(order);
    layout.items(&order.items);
    layout.totals(order);
    if order.has_cash_payment() {
        layout.payment(order);
    }
    layout.footer();

    Ok(layout.commands)
}

/// Encode directives into ESC/POS bytes
pub fn encode(commands: &[Command]) -> Vec<u8> {
    EscPosBuilder::from_commands(commands)
}

/// Receipt renderer bound to one shop and paper width
///
/// The optional logo is rasterized once, when the renderer is built.
#[derive(Debug, Clone)]
pub struct ReceiptFormatter {
    shop: ShopProfile,
    width: usize,
    logo: Option<Vec<u8>>,
}

impl ReceiptFormatter {
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(shop: ShopProfile, width: usize) -> Self {
        let logo = shop.logo_path.as_deref().and_then(load_logo);
        Self { shop, width, logo }
    }

    /// Directives for one receipt, logo first when configured
    pub fn format(&self, order: &Order) -> Result<Vec<Command>, ReceiptError> {
        let body = format(order, &self.shop, self.width)?;

        let Some(logo) = &self.logo else {
            return Ok(body);
        };

        let mut commands = Vec::with_capacity(body.len() + 2);
        commands.push(Command::Justify(Justify::Center));
        commands.push(Command::Raw(logo.clone()));
        commands.extend(body);
        Ok(commands)
    }

    /// Complete ESC/POS job for one receipt
    pub fn render(&self, order: &Order) -> Result<Vec<u8>, ReceiptError> {
        let commands = self.format(order)?;
        Ok(encode(&commands))
    }
}

impl Default for ReceiptFormatter {
    fn default() -> Self {
        Self::new(ShopProfile::default(), 48)
    }
}

#[cfg(feature = "logo")]
fn load_logo(path: &str) -> Option<Vec<u8>> {
    kiosk_printer::process_logo(path)
}

#[cfg(not(feature = "logo"))]
fn load_logo(path: &str) -> Option<Vec<u8>> {
    tracing::warn!(path, "Logo support not compiled in, ignoring");
    None
}

/// Accumulates directives while walking the receipt sections
struct Layout<'a> {
    shop: &'a ShopProfile,
    width: usize,
    commands: Vec<Command>,
}

impl<'a> Layout<'a> {
    fn new(shop: &'a ShopProfile, width: usize) -> Self {
        Self {
            shop,
            width,
            commands: Vec::with_capacity(64),
        }
    }

    fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn line(&mut self, text: impl Into<String>) {
        self.commands.push(Command::Line(text.into()));
    }

    fn separator(&mut self) {
        self.line("-".repeat(self.width));
    }

    fn header(&mut self) {
        self.push(Command::Justify(Justify::Center));
        self.push(Command::Bold(true));
        self.line(self.shop.name.clone());
        self.push(Command::Bold(false));

        let shop = self.shop;
        for text in [&shop.tagline, &shop.address, &shop.phone] {
            if !text.trim().is_empty() {
                self.line(text.clone());
            }
        }
    }

    fn banner(&mut self, order: &Order) {
        self.push(Command::Justify(Justify::Left));
        self.separator();
        self.line("RETAIL SALE BILL");
        self.separator();
        self.line(spread(
            &format!("Date: {}", order.date),
            &format!("Time: {}", order.time),
            self.width,
        ));
        self.line(format!("Invoice No: {}", order.invoice_number));
        self.line(format!("Sales Ref: {}", self.shop.sales_ref));
        self.line(format!("Customer: {}", order.customer_name));
        self.separator();
    }

    fn items(&mut self, items: &[LineItem]) {
        let table = Table::new(&ITEM_COLUMNS, self.width);

        self.line(table.row(&["DESCRIPTION", "QTY", "PRICE", "AMOUNT"]));
        self.separator();

        for item in items {
            let name: String = item.name.chars().take(ITEM_NAME_MAX).collect();
            self.line(table.row(&[
                name,
                item.quantity.normalize().to_string(),
                plain_money(item.unit_price),
                plain_money(item.amount()),
            ]));
        }
    }

    fn totals(&mut self, order: &Order) {
        self.separator();
        self.total_line("SUB TOTAL", self.money(order.sub_total));
        self.total_line("SC", self.money(Decimal::ZERO));
        self.total_line(
            "DISCOUNT",
            format!("{} %", order.discount_percent.normalize()),
        );
        self.total_line("DISCOUNT AMOUNT", self.money(order.discount_amount));
        self.total_line("NET AMOUNT", self.money(order.total_bill));
        self.separator();
    }

    fn payment(&mut self, order: &Order) {
        self.total_line("CUSTOMER PAID", self.money(order.cash_amount));
        self.total_line("BALANCE", self.money(order.change_amount));
        self.separator();
    }

    fn footer(&mut self) {
        self.push(Command::Justify(Justify::Center));
        self.line(self.shop.footer.clone());
        self.push(Command::Feed(TAIL_FEED));
        self.push(Command::Cut);
    }

    /// Label in a fixed field, value right-justified in what remains
    ///
    /// A value wider than its field eats into the label gap; it is never cut.
    fn total_line(&mut self, label: &str, value: String) {
        let value_width = self.width.saturating_sub(TOTALS_LABEL_WIDTH);
        if text_width(&value) > value_width {
            self.line(spread(label, &value, self.width));
            return;
        }
        self.line(format!(
            "{}{}",
            pad_text(label, TOTALS_LABEL_WIDTH, false),
            pad_text(&value, value_width, true)
        ));
    }

    fn money(&self, value: Decimal) -> String {
        format!("{} {}", self.shop.currency, plain_money(value))
    }
}

/// Two decimal places, half away from zero
fn plain_money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// `left` flush left and `right` flush right on one line
fn spread(left: &str, right: &str, width: usize) -> String {
    let used = text_width(left) + text_width(right);
    let gap = width.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}
