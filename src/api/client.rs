use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::{ApiError, ApiRequest, Method, Transport, Upload};
use crate::config::Config;
use crate::session::SessionContext;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: SessionContext,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        session: SessionContext,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            session,
        })
    }

    pub fn from_config(cfg: &Config, session: SessionContext) -> Result<Self, ApiError> {
        let base_url = Url::parse(cfg.api.base_url.trim())
            .map_err(|e| ApiError::Endpoint(format!("{}: {e}", cfg.api.base_url)))?;
        Self::new(
            base_url,
            session,
            cfg.api.timeout_seconds.map(Duration::from_secs),
            &cfg.api.user_agent,
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Endpoint(format!("{path}: {e}")))
    }

    /// Build the outgoing request, attaching the persisted token when there is one.
    ///
    /// The backend expects the bare token in `Authorization`, without a scheme.
    pub async fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .http
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(token) = self.session.token().await? {
            builder = builder.header("Authorization", token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Value, ApiError> {
        info!(method = %request.method(), url = %request.url(), "api request");
        for (name, value) in request.headers() {
            if name.as_str().eq_ignore_ascii_case("authorization") {
                info!("  {}: [REDACTED]", name);
            } else {
                info!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }

        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;
        info!(status = status.as_u16(), bytes = body.len(), "api response");

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "api error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Transport for ApiClient {
    #[instrument(skip_all, fields(method = request.method.as_str(), path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let built = self.build_request(&request).await?;
        self.execute(built).await
    }

    #[instrument(skip_all, fields(path = %upload.path, file = %upload.file_name))]
    async fn upload(&self, upload: Upload) -> Result<Value, ApiError> {
        let url = self.endpoint(&upload.path)?;
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let mut form = reqwest::multipart::Form::new().part(upload.file_field, part);
        for (name, value) in upload.fields {
            form = form.text(name, value);
        }

        let mut builder = self.http.post(url).multipart(form);
        if let Some(token) = self.session.token().await? {
            builder = builder.header("Authorization", token);
        }
        let request = builder.build()?;
        self.execute(request).await
    }
}

/// `Url::join` replaces the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (SessionContext, ApiClient) {
        let session = SessionContext::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(
            Url::parse("https://uports.in/admin").unwrap(),
            session.clone(),
            None,
            "test-agent",
        )
        .unwrap();
        (session, client)
    }

    #[tokio::test]
    async fn build_request_without_session_has_no_authorization() {
        let (_session, client) = client();
        let request = client
            .build_request(&ApiRequest::get("/api/v1/GetCategoryBB"))
            .await
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/admin/api/v1/GetCategoryBB");
        assert!(request.headers().get("Authorization").is_none());
        assert_eq!(
            request
                .headers()
                .get("Content-Type")
                .and_then(|h| h.to_str().ok())
                .unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn build_request_injects_persisted_token() {
        let (session, client) = client();
        session
            .save(&Session {
                user_id: "7".into(),
                name: "Acme Co".into(),
                user_type: "2".into(),
                token: "abc".into(),
                minimum_qty: None,
            })
            .await
            .unwrap();

        let request = client
            .build_request(&ApiRequest::post(
                "api/v1/AddToCart",
                json!({"user_id": 7, "product_id": 3, "quantity": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://uports.in/admin/api/v1/AddToCart");
        assert_eq!(
            request
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .unwrap(),
            "abc"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let parsed: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(parsed["product_id"], 3);
    }

    #[test]
    fn trailing_slash_is_added_once() {
        let url = with_trailing_slash(Url::parse("https://uports.in/admin").unwrap());
        assert_eq!(url.path(), "/admin/");
        let url = with_trailing_slash(url);
        assert_eq!(url.path(), "/admin/");
    }
}
