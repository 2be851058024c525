use std::fmt;
use tracing::warn;

use super::{Notice, Outcome, Transition};
use crate::api::{image_url, ApiError};
use crate::checkout::{format_amount, QuantityStep};
use crate::model::{
    ApiResponse, Category, Product, ProductVariant, StatusReply, SubCategory, UserType, STATUS_OK,
};
use crate::navigation::Route;
use crate::services::media::{ImageSource, MediaError};
use crate::services::AppContext;
use crate::validation::ValidationError;

pub struct HomeScreen {
    ctx: AppContext,
    pub user_name: String,
    pub user_type: UserType,
    pub cart_count: u32,
    /// Absolute banner image URLs.
    pub banners: Vec<String>,
    pub categories: Vec<Category>,
    pub busy: bool,
}

impl HomeScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user_name: String::new(),
            user_type: UserType::default(),
            cart_count: 0,
            banners: Vec::new(),
            categories: Vec::new(),
            busy: false,
        }
    }

    /// Reads the session, then fetches banners and categories together.
    pub async fn load(&mut self) -> Outcome {
        match self.ctx.session.current().await {
            Ok(user) => {
                self.user_name = user.name.clone().unwrap_or_default();
                self.user_type = user.kind();
            }
            Err(err) => warn!(error = %err, "failed to read session"),
        }
        self.refresh_cart_count().await;

        self.busy = true;
        let fetched = futures::try_join!(
            self.ctx.catalog.banners(self.user_type.code()),
            self.ctx.catalog.categories(),
        );
        self.busy = false;

        match fetched {
            Ok((banners, categories)) => {
                if banners.is_ok() {
                    self.banners = banners
                        .sliders
                        .iter()
                        .map(|s| image_url(&self.ctx.asset_base, &banners.image_url, &s.slider))
                        .filter(|u| !u.is_empty())
                        .collect();
                }
                if categories.is_ok() {
                    self.categories = categories.categories;
                }
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load home page", &err).into(),
        }
    }

    async fn refresh_cart_count(&mut self) {
        match self.ctx.cart.cached_count().await {
            Ok(count) => self.cart_count = count,
            Err(err) => warn!(error = %err, "failed to read cart count"),
        }
    }

    /// Route for the category at `index`.
    pub fn open_category(&self, index: usize) -> Option<Route> {
        self.categories.get(index).map(|c| Route::SubCategory {
            category_id: c.id,
            category_name: c.name.clone(),
        })
    }

    /// Captures a grocery list image from `source` and uploads it. Meant to
    /// run from [`Route::UploadGroceryList`]; a successful upload goes back.
    pub async fn upload_grocery_list(&mut self, source: &dyn ImageSource) -> Outcome {
        let user_id = match self.ctx.session.user_id().await {
            Ok(Some(id)) => id,
            Ok(None) => return Notice::from(ValidationError::NotLoggedIn).into(),
            Err(err) => return Notice::failure("Error", "Please login to continue", &err).into(),
        };

        let image = match source.capture().await {
            Ok(Some(image)) => image,
            Ok(None) => return Notice::info("Upload", "No image selected").into(),
            Err(err) => return Notice::failure("Error", "Failed to capture image", &err).into(),
        };

        self.busy = true;
        let result = self.ctx.media.upload_grocery_list(&image, user_id).await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => Outcome::notice(Notice::success(
                "Success",
                resp.message_or("Grocery list uploaded successfully"),
            ))
            .then(Transition::Back),
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to upload grocery list")).into(),
            Err(MediaError::Read { .. }) => Notice::error("Error", "Failed to capture image").into(),
            Err(err) => Notice::failure("Error", "Failed to upload grocery list", &err).into(),
        }
    }

    pub async fn logout(&mut self) -> Outcome {
        match self.ctx.auth.logout().await {
            Ok(()) => Outcome::none().then(Transition::Reset(Route::Login)),
            Err(err) => Notice::failure("Error", "Failed to logout", &err).into(),
        }
    }
}

impl fmt::Display for HomeScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.user_name.is_empty() {
            "Guest"
        } else {
            self.user_name.as_str()
        };
        writeln!(f, "Hello, {name} ({})    Cart: {}", self.user_type.label(), self.cart_count)?;
        if !self.banners.is_empty() {
            writeln!(f, "Offers:")?;
            for banner in &self.banners {
                writeln!(f, "  {banner}")?;
            }
        }
        write!(f, "Categories:")?;
        if self.categories.is_empty() {
            write!(f, " none")?;
        }
        for (i, category) in self.categories.iter().enumerate() {
            write!(f, "\n  [{i}] {} (#{})", category.name, category.id)?;
            if let Some(sub) = category.sub_name.as_deref().filter(|s| !s.is_empty()) {
                write!(f, " - {sub}")?;
            }
        }
        Ok(())
    }
}

pub struct SubCategoryScreen {
    ctx: AppContext,
    pub category_id: i64,
    pub category_name: String,
    pub subcategories: Vec<SubCategory>,
    pub cart_count: u32,
}

impl SubCategoryScreen {
    pub fn new(ctx: AppContext, category_id: i64, category_name: impl Into<String>) -> Self {
        Self {
            ctx,
            category_id,
            category_name: category_name.into(),
            subcategories: Vec::new(),
            cart_count: 0,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        if let Ok(count) = self.ctx.cart.cached_count().await {
            self.cart_count = count;
        }
        match self.ctx.catalog.subcategories(self.category_id).await {
            Ok(resp) => {
                if resp.is_ok() {
                    if let Some(list) = resp.result {
                        self.subcategories = list.subcategories;
                    }
                }
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load subcategories", &err).into(),
        }
    }

    pub fn open(&self, index: usize) -> Option<Route> {
        self.subcategories.get(index).map(|s| Route::Product {
            subcategory_id: s.id,
            subcategory_name: s.name.clone(),
        })
    }
}

impl fmt::Display for SubCategoryScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    Cart: {}", self.category_name, self.cart_count)?;
        for (i, sub) in self.subcategories.iter().enumerate() {
            let desc = sub
                .short_desc
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("Best offer applicable");
            write!(f, "\n  [{i}] {} (#{}) - {desc}", sub.name, sub.id)?;
        }
        Ok(())
    }
}

/// Product list with a selected variant per product.
pub struct ProductScreen {
    ctx: AppContext,
    pub subcategory_id: i64,
    pub subcategory_name: String,
    pub products: Vec<Product>,
    /// Selected variant index for each entry of `products`.
    pub selected: Vec<usize>,
    pub cart_count: u32,
    pub user_id: Option<i64>,
    pub busy: bool,
}

impl ProductScreen {
    pub fn new(ctx: AppContext, subcategory_id: i64, subcategory_name: impl Into<String>) -> Self {
        Self {
            ctx,
            subcategory_id,
            subcategory_name: subcategory_name.into(),
            products: Vec::new(),
            selected: Vec::new(),
            cart_count: 0,
            user_id: None,
            busy: false,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        match self.ctx.session.user_id().await {
            Ok(id) => self.user_id = id,
            Err(err) => warn!(error = %err, "failed to read session"),
        }
        if let Ok(count) = self.ctx.cart.cached_count().await {
            self.cart_count = count;
        }
        self.reload_products().await
    }

    async fn reload_products(&mut self) -> Outcome {
        self.busy = true;
        let result = self
            .ctx
            .catalog
            .products(self.subcategory_id, self.user_id)
            .await;
        self.busy = false;

        match result {
            Ok(resp) => {
                if resp.is_ok() {
                    // keep earlier selections that still point at a variant
                    let previous = std::mem::take(&mut self.selected);
                    self.selected = resp
                        .products
                        .iter()
                        .enumerate()
                        .map(|(i, p)| {
                            previous
                                .get(i)
                                .copied()
                                .filter(|&v| v < p.list_product.len())
                                .unwrap_or(0)
                        })
                        .collect();
                    self.products = resp.products;
                }
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load products", &err).into(),
        }
    }

    pub fn selected_variant(&self, product_index: usize) -> Option<&ProductVariant> {
        let product = self.products.get(product_index)?;
        let variant = self.selected.get(product_index).copied().unwrap_or(0);
        product.list_product.get(variant)
    }

    pub fn select_variant(&mut self, product_index: usize, variant_index: usize) -> bool {
        let valid = self
            .products
            .get(product_index)
            .is_some_and(|p| variant_index < p.list_product.len());
        if valid {
            if let Some(slot) = self.selected.get_mut(product_index) {
                *slot = variant_index;
            }
        }
        valid
    }

    /// Puts one unit of the selected variant in the cart.
    pub async fn add_to_cart(&mut self, product_index: usize) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::error("Error", "Please login to add items to cart").into();
        };
        let Some(variant) = self.selected_variant(product_index).cloned() else {
            return Notice::error("Error", "Product not found").into();
        };
        if !variant.in_stock() {
            return Notice::error("Error", "Out of stock").into();
        }

        match self.ctx.cart.add(user_id, variant.id, 1).await {
            Ok(resp) if resp.is_ok() => {
                self.after_cart_change(user_id).await;
                Notice::success("Success", "Item added to cart").into()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to add item to cart")).into(),
            Err(err) => Notice::failure("Error", "Failed to add item to cart", &err).into(),
        }
    }

    /// Moves the selected variant's in-cart quantity to `desired`.
    pub async fn set_quantity(&mut self, product_index: usize, desired: i64) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::error("Error", "Please login to add items to cart").into();
        };
        let Some(variant) = self.selected_variant(product_index).cloned() else {
            return Notice::error("Error", "Product not found").into();
        };
        if desired > variant.quantity && desired > variant.available_stock {
            return Notice::error("Error", "Not enough stock").into();
        }

        let result = match QuantityStep::plan(variant.quantity, desired) {
            QuantityStep::Noop => return Outcome::none(),
            QuantityStep::Add(delta) => self.ctx.cart.add(user_id, variant.id, delta).await,
            QuantityStep::Remove => self.remove_variant(user_id, variant.id).await,
        };

        match result {
            Ok(resp) if resp.is_ok() => {
                self.after_cart_change(user_id).await;
                Outcome::none()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to update quantity")).into(),
            Err(err) => Notice::failure("Error", "Failed to update quantity", &err).into(),
        }
    }

    /// Removal goes by cart line id, so the cart is fetched to find it.
    async fn remove_variant(
        &self,
        user_id: i64,
        variant_id: i64,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        let cart = self.ctx.cart.cart_details(user_id).await?;
        let line = cart
            .into_lines()
            .into_iter()
            .find(|line| line.product_id == variant_id);
        match line {
            Some(line) => self.ctx.cart.remove(line.id).await,
            // already gone; report it as done
            None => Ok(ApiResponse {
                status: STATUS_OK,
                message: None,
                result: None,
                image_url: None,
            }),
        }
    }

    async fn after_cart_change(&mut self, user_id: i64) {
        match self.ctx.cart.cart_details(user_id).await {
            Ok(_) => {
                if let Ok(count) = self.ctx.cart.cached_count().await {
                    self.cart_count = count;
                }
            }
            Err(err) => warn!(error = %err, "failed to refresh cart count"),
        }
        let outcome = self.reload_products().await;
        if let Some(notice) = outcome.notice {
            warn!(%notice, "product refresh failed");
        }
    }
}

impl fmt::Display for ProductScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    Cart: {}", self.subcategory_name, self.cart_count)?;
        if self.products.is_empty() {
            write!(f, "\n  No products found")?;
        }
        for (i, product) in self.products.iter().enumerate() {
            write!(f, "\n[{i}] {}", product.eng_name)?;
            if let Some(tamil) = product.tml_name.as_deref().filter(|t| !t.is_empty()) {
                write!(f, " / {tamil}")?;
            }
            let selected = self.selected.get(i).copied().unwrap_or(0);
            for (v, variant) in product.list_product.iter().enumerate() {
                let marker = if v == selected { '*' } else { ' ' };
                write!(
                    f,
                    "\n   {marker}({v}) {:<8} {}  MRP {}",
                    variant.product_size,
                    format_amount(variant.sales_price),
                    format_amount(variant.regular_price),
                )?;
                if !variant.offer_price.is_zero() {
                    write!(f, "  {} off", format_amount(variant.offer_price))?;
                }
                if !variant.in_stock() {
                    write!(f, "  out of stock")?;
                } else if variant.quantity > 0 {
                    write!(f, "  in cart: {}", variant.quantity)?;
                }
            }
        }
        Ok(())
    }
}
