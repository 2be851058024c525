//! Domain services, one per backend resource area.
//!
//! Services validate nothing; they forward to the [`Transport`] and, on a
//! `status == 1` reply, mirror selected fields into the session store.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod media;
pub mod order;
pub mod push;

use std::sync::Arc;

use crate::api::Transport;
use crate::session::SessionContext;

pub use auth::{AuthService, RegisterRequest, UpdateProfileRequest};
pub use cart::CartService;
pub use catalog::CatalogService;
pub use media::{ImageAsset, ImageSource, MediaService};
pub use order::{OrderLine, OrderService};
pub use push::PushRegistry;

/// Everything a screen needs, built once and handed to each screen.
#[derive(Clone)]
pub struct AppContext {
    pub session: SessionContext,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub cart: CartService,
    pub orders: OrderService,
    pub media: MediaService,
    /// Prefix for relative image paths returned by the backend.
    pub asset_base: String,
    pub app_version: String,
}

impl AppContext {
    pub fn new(
        api: Arc<dyn Transport>,
        session: SessionContext,
        push: Arc<dyn PushRegistry>,
        asset_base: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            auth: AuthService::new(api.clone(), session.clone(), push),
            catalog: CatalogService::new(api.clone()),
            cart: CartService::new(api.clone(), session.clone()),
            orders: OrderService::new(api.clone()),
            media: MediaService::new(api),
            session,
            asset_base: asset_base.into(),
            app_version: app_version.into(),
        }
    }
}
