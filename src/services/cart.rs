use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api::{ApiError, Transport};
use crate::model::{ApiResponse, CartResponse, DeliveryInfo, StatusReply};
use crate::session::SessionContext;

/// Cart endpoints. Quantity changes are signed deltas sent through
/// `AddToCart`; taking a line out of the cart uses `RemoveFromCart`.
#[derive(Clone)]
pub struct CartService {
    api: Arc<dyn Transport>,
    session: SessionContext,
}

impl CartService {
    pub fn new(api: Arc<dyn Transport>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Fetches the cart and mirrors its line count into the store ("0" on any
    /// non-success reply).
    #[instrument(skip(self))]
    pub async fn cart_details(&self, user_id: i64) -> Result<CartResponse, ApiError> {
        let response: CartResponse = self
            .api
            .get(&format!("api/v1/GetCartDetails/{user_id}"))
            .await?;

        let count = if response.is_ok() { response.result.len() } else { 0 };
        self.session.set_cart_count(count).await?;
        debug!(count, "cart count cached");
        Ok(response)
    }

    /// Adds `delta` units (negative to take units away) of `product_id`.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        user_id: i64,
        product_id: i64,
        delta: i64,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .post(
                "api/v1/AddToCart",
                &json!({ "user_id": user_id, "product_id": product_id, "quantity": delta }),
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, cart_item_id: i64) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .post("api/v1/RemoveFromCart", &json!({ "id": cart_item_id }))
            .await
    }

    /// Fetches the user's delivery charge, caching it when the reply carries one.
    #[instrument(skip(self))]
    pub async fn delivery_charge(&self, user_id: i64) -> Result<ApiResponse<DeliveryInfo>, ApiError> {
        let response: ApiResponse<DeliveryInfo> = self
            .api
            .get(&format!("api/v1/GetDeliveryCharge/{user_id}"))
            .await?;

        if response.is_ok() {
            if let Some(charge) = response
                .result
                .as_ref()
                .and_then(|r| r.area.as_ref())
                .and_then(|a| a.delivery_charge)
            {
                self.session.set_delivery_charge(charge).await?;
            }
        }
        Ok(response)
    }

    /// Line count cached by the last successful cart fetch.
    pub async fn cached_count(&self) -> Result<u32, ApiError> {
        Ok(self.session.cart_count().await?)
    }
}
