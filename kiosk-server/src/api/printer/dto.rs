//! Print request payloads
//!
//! Tills send loosely typed JSON: amounts arrive as numbers or numeric
//! strings, invoice numbers as strings or numbers, and any field may be
//! missing. Everything is normalised here so the formatter only sees
//! well-typed [`Order`]s.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::receipt::{DEFAULT_CUSTOMER, LineItem, Order};

/// POST /print body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_bill: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_amount: Decimal,
    /// Discount percentage
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub change_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sub_total: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cash_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bill_no: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Decimal,
}

impl From<CartItem> for LineItem {
    fn from(item: CartItem) -> Self {
        LineItem::new(item.name, item.quantity, item.price)
    }
}

impl From<PrintRequest> for Order {
    fn from(req: PrintRequest) -> Self {
        let customer_name = req
            .customer
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER.to_string());

        Order {
            total_bill: req.total_bill,
            discount_amount: req.discount_amount,
            discount_percent: req.discount,
            change_amount: req.change_amount,
            sub_total: req.sub_total,
            cash_amount: req.cash_amount,
            date: req.date,
            time: req.time,
            items: req
                .cart
                .unwrap_or_default()
                .into_iter()
                .map(LineItem::from)
                .collect(),
            customer_name,
            invoice_number: req.bill_no,
        }
    }
}

/// GET /printer-status body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStatusResponse {
    pub success: bool,
    pub message: String,
    pub printer_connected: bool,
}

impl PrinterStatusResponse {
    pub fn from_connected(connected: bool) -> Self {
        let message = if connected {
            "✅ Printer is connected"
        } else {
            "❌ Printer is NOT connected"
        };
        Self {
            success: true,
            message: message.to_string(),
            printer_connected: connected,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

/// Number, numeric string, blank or null; blank and null read as zero
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(Decimal::ZERO),
        Some(Scalar::Number(n)) => n.to_string(),
        Some(Scalar::Text(s)) => s.trim().to_string(),
    };
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| D::Error::custom(format!("invalid number: {raw}")))
}

/// String or number, null reads as empty
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Number(n)) => n.to_string(),
        Some(Scalar::Text(s)) => s,
    })
}
