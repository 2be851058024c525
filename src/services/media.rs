//! Grocery-list image capture and upload.
//!
//! Device capture is modelled as a single async call: `Ok(Some(_))` is a picked
//! image, `Ok(None)` means the user cancelled, `Err(_)` is a real failure.
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

use crate::api::{ApiError, Transport, Upload};
use crate::model::ApiResponse;

pub const DEFAULT_FILE_NAME: &str = "image.jpg";
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// The URI / file name / mime type triple handed over by the capture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub uri: String,
    pub file_name: String,
    pub mime_type: String,
}

impl ImageAsset {
    /// Fills missing name or type with the capture defaults.
    pub fn new(uri: impl Into<String>, file_name: Option<String>, mime_type: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            file_name: file_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("capture failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn capture(&self) -> Result<Option<ImageAsset>, CaptureError>;
}

/// Picks an image from the local filesystem; an empty path is a cancellation.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn capture(&self) -> Result<Option<ImageAsset>, CaptureError> {
        if self.path.as_os_str().is_empty() {
            return Ok(None);
        }
        let meta = fs::metadata(&self.path)
            .await
            .map_err(|e| CaptureError::Failed(format!("{}: {e}", self.path.display())))?;
        if !meta.is_file() {
            return Err(CaptureError::Failed(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(Some(ImageAsset::new(
            self.path.to_string_lossy().to_string(),
            file_name,
            Some(content_type(&self.path).to_string()),
        )))
    }
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[derive(Clone)]
pub struct MediaService {
    api: Arc<dyn Transport>,
}

impl MediaService {
    pub fn new(api: Arc<dyn Transport>) -> Self {
        Self { api }
    }

    /// Uploads a captured grocery list as multipart `image` plus `user_id`.
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn upload_grocery_list(
        &self,
        image: &ImageAsset,
        user_id: i64,
    ) -> Result<ApiResponse<serde_json::Value>, MediaError> {
        let bytes = fs::read(&image.uri).await.map_err(|source| MediaError::Read {
            path: image.uri.clone(),
            source,
        })?;
        let upload = Upload {
            path: "api/v1/UploadGroceryList".to_string(),
            file_field: "image".to_string(),
            file_name: image.file_name.clone(),
            mime_type: image.mime_type.clone(),
            bytes,
            fields: vec![("user_id".to_string(), user_id.to_string())],
        };
        let value = self.api.upload(upload).await?;
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_value(value).map_err(ApiError::from)?;
        info!(status = response.status, "grocery list uploaded");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_defaults() {
        let asset = ImageAsset::new("/tmp/x", None, Some(String::new()));
        assert_eq!(asset.file_name, "image.jpg");
        assert_eq!(asset.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn empty_path_is_cancellation() {
        let source = FileImageSource::new("");
        assert_eq!(source.capture().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_is_failure() {
        let td = tempfile::tempdir().unwrap();
        let source = FileImageSource::new(td.path().join("absent.png"));
        assert!(matches!(
            source.capture().await,
            Err(CaptureError::Failed(_))
        ));
    }

    #[tokio::test]
    async fn picks_existing_file() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("List.PNG");
        std::fs::write(&path, b"png").unwrap();
        let asset = FileImageSource::new(&path).capture().await.unwrap().unwrap();
        assert_eq!(asset.file_name, "List.PNG");
        assert_eq!(asset.mime_type, "image/png");
    }
}
