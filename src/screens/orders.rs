use std::fmt;

use super::{Notice, Outcome, Transition};
use crate::checkout::format_amount;
use crate::model::{Order, StatusReply, UserType};
use crate::navigation::Route;
use crate::services::AppContext;
use crate::validation::ValidationError;

pub struct MyOrdersScreen {
    ctx: AppContext,
    pub orders: Vec<Order>,
    pub busy: bool,
}

impl MyOrdersScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            orders: Vec::new(),
            busy: false,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        let user_id = match self.ctx.session.user_id().await {
            Ok(Some(id)) => id,
            Ok(None) => return Notice::from(ValidationError::NotLoggedIn).into(),
            Err(err) => return Notice::failure("Error", "Please login to continue", &err).into(),
        };

        self.busy = true;
        let result = self.ctx.orders.my_orders(user_id).await;
        self.busy = false;

        match result {
            Ok(resp) => {
                self.orders = if resp.is_ok() { resp.result } else { Vec::new() };
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load orders", &err).into(),
        }
    }

    pub fn open(&self, index: usize) -> Outcome {
        match self.orders.get(index) {
            Some(order) => Outcome::none().then(Transition::Push(Route::OrderDetails {
                order_id: order.id,
            })),
            None => Notice::error("Error", "Order not found").into(),
        }
    }
}

impl fmt::Display for MyOrdersScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "My Orders")?;
        if self.orders.is_empty() {
            return write!(f, "\n  No orders yet");
        }
        for (i, order) in self.orders.iter().enumerate() {
            write!(
                f,
                "\n  [{i}] #{:<8} {:<11} {:>12}  {}",
                order_label(order),
                order.placed_on(),
                format_amount(order.total_amount),
                order.status(),
            )?;
        }
        Ok(())
    }
}

fn order_label(order: &Order) -> String {
    if order.order_number.trim().is_empty() {
        order.id.to_string()
    } else {
        order.order_number.clone()
    }
}

pub struct OrderDetailsScreen {
    ctx: AppContext,
    pub order_id: i64,
    pub order: Option<Order>,
    pub busy: bool,
}

impl OrderDetailsScreen {
    pub fn new(ctx: AppContext, order_id: i64) -> Self {
        Self {
            ctx,
            order_id,
            order: None,
            busy: false,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        let user = match self.ctx.session.current().await {
            Ok(user) => user,
            Err(err) => return Notice::failure("Error", "Please login to continue", &err).into(),
        };
        let Some(user_id) = user.numeric_id() else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        let user_type = user.user_type.as_deref().map(UserType::from_code);

        self.busy = true;
        let result = self
            .ctx
            .orders
            .order_details(self.order_id, user_id, user_type)
            .await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => {
                self.order = resp.result;
                Outcome::none()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Order not found")).into(),
            Err(err) => Notice::failure("Error", "Failed to load order details", &err).into(),
        }
    }
}

impl fmt::Display for OrderDetailsScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(order) = &self.order else {
            return write!(f, "Order #{}: no details", self.order_id);
        };
        writeln!(f, "Order #{}", order_label(order))?;
        writeln!(f, "  Placed on: {}", order.placed_on())?;
        writeln!(f, "  Status:    {}", order.status())?;
        for item in &order.items {
            writeln!(
                f,
                "  {} x {}  {}",
                item.product_name,
                item.quantity,
                format_amount(item.price),
            )?;
        }
        writeln!(f, "  Delivery charge: {}", format_amount(order.delivery_charge))?;
        write!(f, "  Total:           {}", format_amount(order.total_amount))
    }
}
