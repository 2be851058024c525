use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use crate::api::{ApiError, Transport};
use crate::model::{ApiResponse, BannerResponse, CategoryResponse, ProductResponse, SubCategoryList};

/// Products are priced per user; logged-out browsing uses this id.
pub const GUEST_USER_ID: i64 = 1;

#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn Transport>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn Transport>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn banners(&self, user_type: i64) -> Result<BannerResponse, ApiError> {
        self.api.get(&format!("api/v1/GetBanner/{user_type}")).await
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<CategoryResponse, ApiError> {
        self.api.get("api/v1/GetCategoryBB").await
    }

    #[instrument(skip(self))]
    pub async fn subcategories(&self, category_id: i64) -> Result<ApiResponse<SubCategoryList>, ApiError> {
        self.api
            .get(&format!("api/v1/GetSubCategoryBB/{category_id}"))
            .await
    }

    #[instrument(skip(self))]
    pub async fn products(
        &self,
        subcategory_id: i64,
        user_id: Option<i64>,
    ) -> Result<ProductResponse, ApiError> {
        self.api
            .post(
                "api/v1/GetProductBB",
                &json!({
                    "subcategory_id": subcategory_id,
                    "user_id": user_id.unwrap_or(GUEST_USER_ID),
                }),
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<ProductResponse, ApiError> {
        self.api
            .post("api/v1/SearchProducts", &json!({ "query": query }))
            .await
    }

    /// Asks the backend whether `version` is still supported.
    #[instrument(skip(self))]
    pub async fn check_version(&self, version: &str) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .get(&format!("api/v1/CheckVersion/{}", version.trim()))
            .await
    }
}
