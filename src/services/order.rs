use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use crate::api::{ApiError, Transport};
use crate::model::{ApiResponse, MinimumOrderResponse, Order, OrderListResponse, UserType};

/// One product line of a placed order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct OrderService {
    api: Arc<dyn Transport>,
}

impl OrderService {
    pub fn new(api: Arc<dyn Transport>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn minimum_order(&self) -> Result<MinimumOrderResponse, ApiError> {
        self.api.get("api/v1/GetMinimumOrder").await
    }

    /// The backend names the line list `medicine`.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn place_order(
        &self,
        user_id: i64,
        lines: &[OrderLine],
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .post(
                "api/v1/place_order",
                &json!({ "order": { "user_id": user_id, "medicine": lines } }),
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn my_orders(&self, user_id: i64) -> Result<OrderListResponse, ApiError> {
        self.api.get(&format!("api/v1/GetMyOrder/{user_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn order_details(
        &self,
        order_id: i64,
        user_id: i64,
        user_type: Option<UserType>,
    ) -> Result<ApiResponse<Order>, ApiError> {
        let user_type = user_type.unwrap_or(UserType::Business).code();
        self.api
            .post(
                "api/v1/GetOrderDetails",
                &json!({
                    "order": { "order_id": order_id, "user_id": user_id, "user_type": user_type }
                }),
            )
            .await
    }
}
