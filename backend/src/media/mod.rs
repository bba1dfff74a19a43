pub mod cloudinary;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudinary::CloudinaryUploader;

/// A file received from the admin form, held in memory until uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Hosted image storage. Returns a stable public URL for each upload.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: UploadFile, folder: &str) -> Result<String, MediaError>;
}
