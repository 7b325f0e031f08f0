//! Remote media store abstraction

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use vitrine_core::models::{MediaKind, PublishTarget, PublishedAsset};
use vitrine_core::StoreBackend;

/// Media store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with an error; `payload` is its response body verbatim
    #[error("{message}")]
    Remote {
        status: u16,
        message: String,
        payload: serde_json::Value,
    },

    #[error("Media store request failed: {0}")]
    Transport(String),

    #[error("Unexpected media store response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Error body reported by the store, when there is one
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            StoreError::Remote { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Parameters of one streaming upload session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub resource_kind: MediaKind,
    /// Chained transformation directives, e.g. `c_limit,h_800,q_auto,w_800/f_auto`
    pub transformation: String,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadOptions {
    pub fn for_target(
        target: &PublishTarget,
        content_type: impl Into<String>,
        file_name: Option<String>,
    ) -> Self {
        Self {
            folder: target.folder.clone(),
            resource_kind: target.kind,
            transformation: target.transformation_string(),
            content_type: content_type.into(),
            file_name,
        }
    }
}

/// Remote media store
///
/// One call is one upload session: the whole buffer is written and the store's
/// verdict is awaited. Implementations never retry.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload `data` with `options` and return the store's descriptor unchanged
    async fn upload_stream(&self, data: Bytes, options: &UploadOptions)
        -> StoreResult<PublishedAsset>;

    /// Get the store backend type
    fn backend_type(&self) -> StoreBackend;
}
