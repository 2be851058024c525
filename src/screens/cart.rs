use rust_decimal::Decimal;
use std::fmt;
use tracing::warn;

use super::{Notice, Outcome, Transition};
use crate::checkout::{self, format_amount, CheckoutGate, QuantityStep};
use crate::model::{CartItem, StatusReply};
use crate::navigation::Route;
use crate::services::AppContext;
use crate::validation::ValidationError;

/// Cart lines with delivery charge and the minimum-order gate.
pub struct CartScreen {
    ctx: AppContext,
    pub user_id: Option<i64>,
    pub lines: Vec<CartItem>,
    pub delivery_charge: Decimal,
    pub minimum_order: Option<Decimal>,
    pub busy: bool,
}

impl CartScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user_id: None,
            lines: Vec::new(),
            delivery_charge: Decimal::ZERO,
            minimum_order: None,
            busy: false,
        }
    }

    /// Cart, delivery charge and minimum order are fetched concurrently.
    pub async fn load(&mut self) -> Outcome {
        let user_id = match self.ctx.session.user_id().await {
            Ok(Some(id)) => id,
            Ok(None) => return Notice::from(ValidationError::NotLoggedIn).into(),
            Err(err) => return Notice::failure("Error", "Please login to continue", &err).into(),
        };
        self.user_id = Some(user_id);

        if let Ok(Some(cached)) = self.ctx.session.delivery_charge().await {
            self.delivery_charge = cached;
        }

        self.busy = true;
        let fetched = futures::try_join!(
            self.ctx.cart.cart_details(user_id),
            self.ctx.cart.delivery_charge(user_id),
            self.ctx.orders.minimum_order(),
        );
        self.busy = false;

        match fetched {
            Ok((cart, delivery, minimum)) => {
                self.lines = cart.into_lines();
                if let Some(charge) = delivery
                    .result
                    .and_then(|r| r.area)
                    .and_then(|a| a.delivery_charge)
                {
                    self.delivery_charge = charge;
                }
                if minimum.is_ok() {
                    self.minimum_order = minimum.amount();
                }
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load cart", &err).into(),
        }
    }

    async fn reload_lines(&mut self, user_id: i64) {
        match self.ctx.cart.cart_details(user_id).await {
            Ok(cart) => self.lines = cart.into_lines(),
            Err(err) => warn!(error = %err, "failed to reload cart"),
        }
    }

    pub fn subtotal(&self) -> Decimal {
        checkout::subtotal(&self.lines)
    }

    pub fn total(&self) -> Decimal {
        checkout::total(&self.lines, self.delivery_charge)
    }

    pub fn gate(&self) -> CheckoutGate {
        CheckoutGate::new(self.subtotal(), self.minimum_order)
    }

    /// Sets line `index` to `desired` units; zero takes the line out of the cart.
    pub async fn change_quantity(&mut self, index: usize, desired: i64) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        let Some(line) = self.lines.get(index).cloned() else {
            return Notice::error("Error", "Item not found in cart").into();
        };

        let result = match QuantityStep::plan(line.quantity, desired) {
            QuantityStep::Noop => return Outcome::none(),
            QuantityStep::Remove => return self.remove(index).await,
            QuantityStep::Add(delta) => self.ctx.cart.add(user_id, line.product_id, delta).await,
        };

        match result {
            Ok(resp) if resp.is_ok() => {
                self.reload_lines(user_id).await;
                Outcome::none()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to update quantity")).into(),
            Err(err) => Notice::failure("Error", "Failed to update quantity", &err).into(),
        }
    }

    pub async fn remove(&mut self, index: usize) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        let Some(line) = self.lines.get(index).cloned() else {
            return Notice::error("Error", "Item not found in cart").into();
        };

        match self.ctx.cart.remove(line.id).await {
            Ok(resp) if resp.is_ok() => {
                self.reload_lines(user_id).await;
                Notice::success("Success", "Item removed from cart").into()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to remove item")).into(),
            Err(err) => Notice::failure("Error", "Failed to remove item", &err).into(),
        }
    }

    /// Places the order for every line with a positive quantity.
    ///
    /// The minimum is fetched again first so a stale threshold never lets a
    /// short order through.
    pub async fn checkout(&mut self) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        let lines = checkout::order_lines(&self.lines);
        if lines.is_empty() {
            return Notice::error("Error", "Your cart is empty").into();
        }

        self.busy = true;
        match self.ctx.orders.minimum_order().await {
            Ok(resp) if resp.is_ok() => self.minimum_order = resp.amount(),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "minimum order refresh failed"),
        }
        let gate = self.gate();
        if !gate.enabled() {
            self.busy = false;
            return Notice::error("Minimum Order", gate.label()).into();
        }

        let result = self.ctx.orders.place_order(user_id, &lines).await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => {
                self.reload_lines(user_id).await;
                Outcome::notice(Notice::success(
                    "Order Placed",
                    resp.message_or("Your order has been placed successfully"),
                ))
                .then(Transition::Replace(Route::MyOrders))
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to place order")).into(),
            Err(err) => Notice::failure("Error", "Failed to place order", &err).into(),
        }
    }
}

impl fmt::Display for CartScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "My Cart")?;
        if self.lines.is_empty() {
            return write!(f, "  Your cart is empty");
        }
        for (i, line) in self.lines.iter().enumerate() {
            let amount = checkout::line_amount(line);
            writeln!(
                f,
                "  [{i}] {} {}  {} x {} = {}",
                line.product_name,
                line.product_size,
                format_amount(line.sales_price),
                line.quantity,
                format_amount(amount),
            )?;
        }
        writeln!(f, "  Subtotal:        {}", format_amount(self.subtotal()))?;
        writeln!(f, "  Delivery charge: {}", format_amount(self.delivery_charge))?;
        writeln!(f, "  Total:           {}", format_amount(self.total()))?;
        write!(f, "  [{}]", self.gate().label())
    }
}
