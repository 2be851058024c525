use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, Transport};
use crate::model::{ApiResponse, AreaResponse, LoginResponse, Profile, StatusReply, UserPayload};
use crate::services::push::PushRegistry;
use crate::session::{CurrentUser, SessionContext};

/// Registration details sent with the OTP request.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub mobile: String,
    pub password: String,
    pub email: String,
    pub company_name: String,
    pub landmark: String,
    pub address: String,
    pub area_id: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub user_id: String,
    pub name: String,
    pub landmark: String,
    pub address: String,
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn Transport>,
    session: SessionContext,
    push: Arc<dyn PushRegistry>,
}

impl AuthService {
    pub fn new(api: Arc<dyn Transport>, session: SessionContext, push: Arc<dyn PushRegistry>) -> Self {
        Self { api, session, push }
    }

    /// On success the session fields from the reply are persisted and the
    /// user is registered for push notifications. A success status that names
    /// no user clears any previous session instead.
    #[instrument(skip_all)]
    pub async fn login(&self, mobile: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .api
            .post(
                "api/v1/login",
                &json!({ "customer": { "mobile": mobile, "password": password } }),
            )
            .await?;

        if response.is_ok() {
            match response.session() {
                Some(session) => {
                    self.session.save(&session).await?;
                    self.push.register(&session.user_id).await;
                    info!(user_id = %session.user_id, "logged in");
                }
                None => {
                    warn!("login reply carried no user");
                    self.session.clear().await?;
                }
            }
        }
        Ok(response)
    }

    /// First registration step: the backend texts an OTP to `request.mobile`.
    #[instrument(skip_all)]
    pub async fn send_otp(&self, request: &RegisterRequest) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .post("api/v1/send_otp", &json!({ "customer": request }))
            .await
    }

    /// Second registration step; a verified account is logged in immediately.
    #[instrument(skip_all)]
    pub async fn verify_otp(&self, mobile: &str, otp: &str) -> Result<ApiResponse<UserPayload>, ApiError> {
        let response: ApiResponse<UserPayload> = self
            .api
            .post("api/v1/VerifyOTP", &json!({ "mobile": mobile, "otp": otp }))
            .await?;

        if response.is_ok() {
            match response.session() {
                Some(session) => {
                    self.session.save(&session).await?;
                    self.push.register(&session.user_id).await;
                    info!(user_id = %session.user_id, "registered and logged in");
                }
                None => {
                    warn!("verification reply carried no user");
                    self.session.clear().await?;
                }
            }
        }
        Ok(response)
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.api
            .post(
                "api/v1/reset_password",
                &json!({ "current_password": current_password, "new_password": new_password }),
            )
            .await
    }

    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.clear().await?;
        self.push.unregister().await;
        info!("logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, ApiError> {
        Ok(self.session.is_logged_in().await?)
    }

    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        Ok(self.session.current().await?)
    }

    #[instrument(skip(self))]
    pub async fn my_profile(&self, user_id: i64) -> Result<ApiResponse<Profile>, ApiError> {
        self.api.get(&format!("api/v1/MyProfile/{user_id}")).await
    }

    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        let response: ApiResponse<serde_json::Value> =
            self.api.post("api/v1/UpdateProfile", request).await?;
        if response.is_ok() && !request.name.trim().is_empty() {
            self.session
                .store()
                .set(crate::store::keys::USER_NAME, request.name.trim())
                .await?;
        }
        Ok(response)
    }

    /// Delivery areas offered in the registration form.
    #[instrument(skip_all)]
    pub async fn areas(&self) -> Result<AreaResponse, ApiError> {
        self.api.get("api/v1/GetArea").await
    }
}
