//! HTTP client wrapper for the storefront backend.
//!
//! Services talk to the backend through the [`Transport`] trait; [`ApiClient`]
//! is the reqwest implementation. Typed `get`/`post`/`put`/`delete` helpers
//! live on `dyn Transport` so any implementation gets them for free.

pub mod client;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

pub use client::ApiClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A JSON call against a path relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Multipart upload: one file part plus plain text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: String,
    pub file_field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON request and return the parsed response body.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;

    /// Send a multipart form and return the parsed response body.
    async fn upload(&self, upload: Upload) -> Result<Value, ApiError>;
}

impl dyn Transport {
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::post(path, serde_json::to_value(body)?))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::put(path, serde_json::to_value(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(ApiRequest::delete(path)).await
    }
}

/// Absolute URL of a backend asset: `base + prefix + path`, empty for an empty path.
pub fn image_url(base_url: &str, prefix: &str, path: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }
    format!("{}{}{}", base_url.trim_end_matches('/'), prefix, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_parts() {
        assert_eq!(
            image_url("https://uports.in/admin/", "/uploads/", "rice.png"),
            "https://uports.in/admin/uploads/rice.png"
        );
        assert_eq!(
            image_url("https://uports.in/admin", "", "/cat/1.png"),
            "https://uports.in/admin/cat/1.png"
        );
        assert_eq!(image_url("https://uports.in/admin", "/uploads/", ""), "");
    }
}
