//! Cloudinary media store
//!
//! Signed uploads against the Cloudinary upload API:
//! `POST {api_base}/{cloud_name}/{resource_type}/upload` with a multipart body.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use vitrine_core::models::PublishedAsset;
use vitrine_core::{CloudinaryConfig, StoreBackend};

use crate::traits::{MediaStore, StoreError, StoreResult, UploadOptions};

const SIGNATURE_ALGORITHM: &str = "sha256";

/// Cloudinary store implementation
pub struct CloudinaryStore {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
}

impl Debug for CloudinaryStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryStore")
            .field("cloud_name", &self.config.cloud_name)
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl CloudinaryStore {
    /// Create a store bound to one account. Credentials are taken from `config`
    /// only; nothing is read from the environment here.
    pub fn new(config: CloudinaryConfig) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()
            .map_err(|e| {
                StoreError::ConfigError(format!("Failed to create HTTP client for Cloudinary: {}", e))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn upload_url(&self, options: &UploadOptions) -> String {
        format!(
            "{}/{}/{}/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            options.resource_kind.as_str()
        )
    }

    /// Parameters covered by the request signature
    fn signed_params(options: &UploadOptions, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", options.folder.clone()),
            ("timestamp", timestamp.to_string()),
            ("transformation", options.transformation.clone()),
        ]
    }
}

/// Canonical `key=value&...` string: keys sorted, empty values dropped.
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex SHA-256 of the canonical parameter string followed by the API secret.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Pull the human-readable message out of a Cloudinary error body.
fn remote_message(payload: &serde_json::Value, status: reqwest::StatusCode) -> String {
    payload
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("Cloudinary upload failed with status {}", status))
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload_stream(
        &self,
        data: Bytes,
        options: &UploadOptions,
    ) -> StoreResult<PublishedAsset> {
        let size = data.len();
        let timestamp = chrono::Utc::now().timestamp();
        let params = Self::signed_params(options, timestamp);
        let signature = sign(&params, &self.config.api_secret);

        let file_name = options
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string());
        let file_part = reqwest::multipart::Part::stream_with_length(data, size as u64)
            .file_name(file_name)
            .mime_str(&options.content_type)
            .map_err(|e| StoreError::Transport(format!("Invalid content type: {}", e)))?;

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in params {
            if !value.is_empty() {
                form = form.text(key, value);
            }
        }
        let form = form
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM)
            .part("file", file_part);

        let url = self.upload_url(options);
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, folder = %options.folder, "Cloudinary request failed");
                StoreError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to read Cloudinary response: {}", e)))?;

        if !status.is_success() {
            let payload = serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_else(|_| {
                serde_json::json!({
                    "error": { "message": String::from_utf8_lossy(&body).to_string() }
                })
            });
            let message = remote_message(&payload, status);
            tracing::warn!(
                status = status.as_u16(),
                folder = %options.folder,
                resource_kind = %options.resource_kind,
                error = %message,
                "Cloudinary rejected upload"
            );
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message,
                payload,
            });
        }

        let descriptor: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| StoreError::InvalidResponse(format!("Invalid JSON: {}", e)))?;
        let asset = PublishedAsset(descriptor);

        tracing::info!(
            folder = %options.folder,
            resource_kind = %options.resource_kind,
            public_id = asset.public_id().unwrap_or("unknown"),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(asset)
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Cloudinary
    }
}
