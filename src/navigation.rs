//! Named routes with typed parameters and a simple navigation stack.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    VerifyOtp { mobile: String },
    Home,
    SubCategory { category_id: i64, category_name: String },
    Product { subcategory_id: i64, subcategory_name: String },
    Cart,
    MyOrders,
    OrderDetails { order_id: i64 },
    ChangePassword,
    Profile,
    Settings,
    UploadGroceryList,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("Login"),
            Route::Register => f.write_str("Register"),
            Route::VerifyOtp { .. } => f.write_str("Verify OTP"),
            Route::Home => f.write_str("Home"),
            Route::SubCategory { category_name, .. } => write!(f, "{category_name}"),
            Route::Product {
                subcategory_name, ..
            } => write!(f, "{subcategory_name}"),
            Route::Cart => f.write_str("My Cart"),
            Route::MyOrders => f.write_str("My Orders"),
            Route::OrderDetails { order_id } => write!(f, "Order #{order_id}"),
            Route::ChangePassword => f.write_str("Change Password"),
            Route::Profile => f.write_str("Profile"),
            Route::Settings => f.write_str("Settings"),
            Route::UploadGroceryList => f.write_str("Upload Grocery List"),
        }
    }
}

/// Navigation stack; the root entry is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    /// Home for a logged-in session, Login otherwise.
    pub fn initial(logged_in: bool) -> Self {
        Self::new(if logged_in { Route::Home } else { Route::Login })
    }

    pub fn current(&self) -> &Route {
        // the stack always holds the root
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Swap the current entry, as after login or logout.
    pub fn replace(&mut self, route: Route) {
        self.stack.pop();
        self.stack.push(route);
    }

    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_route_follows_session() {
        assert_eq!(Navigator::initial(true).current(), &Route::Home);
        assert_eq!(Navigator::initial(false).current(), &Route::Login);
    }

    #[test]
    fn back_never_pops_root() {
        let mut nav = Navigator::new(Route::Home);
        nav.navigate(Route::SubCategory {
            category_id: 4,
            category_name: "Grains".into(),
        });
        nav.navigate(Route::Cart);
        assert_eq!(nav.depth(), 3);
        assert!(nav.back());
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current(), &Route::Home);
    }

    #[test]
    fn replace_and_reset() {
        let mut nav = Navigator::new(Route::Login);
        nav.replace(Route::Home);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current(), &Route::Home);

        nav.navigate(Route::Profile);
        nav.reset(Route::Login);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current().to_string(), "Login");
    }
}
