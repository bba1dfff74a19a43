use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::config::MediaConfig;
use crate::media::{MediaError, MediaUploader, UploadFile};

pub struct CloudinaryUploader {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryUploader {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    fn upload_url(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", self.cloud_name)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Signature over the sorted signed parameters followed by the API secret.
pub(crate) fn sign_params(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("folder={}&timestamp={}{}", folder, timestamp, api_secret);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, file: UploadFile, folder: &str) -> Result<String, MediaError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_params(folder, timestamp, &self.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| MediaError::BadResponse(format!("invalid content type: {}", e)))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        let status = resp.status();
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))?;

        if let Some(err) = body.error {
            error!("Cloudinary rejected upload of {}: {}", file.file_name, err.message);
            return Err(MediaError::BadResponse(err.message));
        }

        let url = body.secure_url.ok_or_else(|| {
            MediaError::BadResponse(format!("missing secure_url (HTTP {})", status))
        })?;
        info!("Uploaded {} to {}", file.file_name, url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_hex_sha256() {
        let sig = sign_params("accounts", 1_700_000_000, "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_depends_on_every_input() {
        let base = sign_params("accounts", 1_700_000_000, "secret");
        assert_eq!(base, sign_params("accounts", 1_700_000_000, "secret"));
        assert_ne!(base, sign_params("other", 1_700_000_000, "secret"));
        assert_ne!(base, sign_params("accounts", 1_700_000_001, "secret"));
        assert_ne!(base, sign_params("accounts", 1_700_000_000, "other"));
    }

    #[test]
    fn test_signature_matches_known_digest() {
        // sha256("folder=f&timestamp=1s")
        let expected = hex::encode(Sha256::digest(b"folder=f&timestamp=1s"));
        assert_eq!(sign_params("f", 1, "s"), expected);
    }
}
