//! Cart arithmetic and the checkout gate.
//!
//! The server owns cart state; these figures are derived locally for display
//! and for deciding whether checkout may be attempted.
use rust_decimal::Decimal;

use crate::model::CartItem;
use crate::services::OrderLine;

/// Price times quantity. Amounts saturate instead of overflowing.
pub fn line_amount(line: &CartItem) -> Decimal {
    line.sales_price.saturating_mul(Decimal::from(line.quantity.max(0)))
}

pub fn subtotal(lines: &[CartItem]) -> Decimal {
    lines
        .iter()
        .map(line_amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn total(lines: &[CartItem], delivery_charge: Decimal) -> Decimal {
    subtotal(lines).saturating_add(delivery_charge)
}

/// Order lines for `place_order`, skipping anything with no quantity.
pub fn order_lines(lines: &[CartItem]) -> Vec<OrderLine> {
    lines
        .iter()
        .filter(|line| line.quantity > 0)
        .map(|line| OrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
        })
        .collect()
}

/// Two decimal places, as shown on price lines.
pub fn format_amount(amount: Decimal) -> String {
    format!("₹{:.2}", amount.round_dp(2))
}

/// Checkout is allowed once the subtotal reaches the server minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutGate {
    pub subtotal: Decimal,
    pub minimum: Decimal,
}

impl CheckoutGate {
    pub fn new(subtotal: Decimal, minimum: Option<Decimal>) -> Self {
        Self {
            subtotal,
            minimum: minimum.unwrap_or(Decimal::ZERO),
        }
    }

    pub fn enabled(&self) -> bool {
        self.subtotal >= self.minimum
    }

    /// Button text; the threshold is shown while checkout is blocked.
    pub fn label(&self) -> String {
        if self.enabled() {
            "Place Order".to_string()
        } else {
            format!("Minimum order {}", format_amount(self.minimum))
        }
    }
}

/// Backend call needed to move a cart line from one quantity to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityStep {
    /// Signed delta for `AddToCart`.
    Add(i64),
    /// The line leaves the cart through `RemoveFromCart`.
    Remove,
    Noop,
}

impl QuantityStep {
    /// Quantities floor at zero; reaching zero is always a removal, never a delta.
    pub fn plan(current: i64, desired: i64) -> Self {
        let current = current.max(0);
        let desired = desired.max(0);
        if desired == current {
            QuantityStep::Noop
        } else if desired == 0 {
            QuantityStep::Remove
        } else {
            QuantityStep::Add(desired - current)
        }
    }
}
