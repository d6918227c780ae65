//! Receipt input data

use rust_decimal::{Decimal, RoundingStrategy};

/// Customer label used when none is supplied
pub const DEFAULT_CUSTOMER: &str = "GENERAL";

/// A completed sale to be printed
///
/// Money values are taken as supplied by the till; only line amounts are
/// computed here.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub total_bill: Decimal,
    pub discount_amount: Decimal,
    pub discount_percent: Decimal,
    pub change_amount: Decimal,
    pub sub_total: Decimal,
    pub cash_amount: Decimal,
    pub date: String,
    pub time: String,
    pub items: Vec<LineItem>,
    pub customer_name: String,
    pub invoice_number: String,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            total_bill: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            change_amount: Decimal::ZERO,
            sub_total: Decimal::ZERO,
            cash_amount: Decimal::ZERO,
            date: String::new(),
            time: String::new(),
            items: Vec::new(),
            customer_name: DEFAULT_CUSTOMER.to_string(),
            invoice_number: String::new(),
        }
    }
}

impl Order {
    /// Whether the payment block (paid / balance) is printed
    pub fn has_cash_payment(&self) -> bool {
        self.cash_amount > Decimal::ZERO
    }
}

/// One cart line
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// quantity × unit price, rounded half away from zero to 2 places
    pub fn amount(&self) -> Decimal {
        (self.quantity * self.unit_price)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_rounds_half_away_from_zero() {
        let item = LineItem::new("Tea", Decimal::from(3), Decimal::new(335, 3));
        assert_eq!(item.amount(), Decimal::new(101, 2));

        let item = LineItem::new("Coke", Decimal::from(2), Decimal::from(100));
        assert_eq!(item.amount(), Decimal::from(200));
    }

    #[test]
    fn test_cash_payment_flag() {
        let mut order = Order::default();
        assert!(!order.has_cash_payment());
        order.cash_amount = Decimal::new(1, 2);
        assert!(order.has_cash_payment());
    }
}
