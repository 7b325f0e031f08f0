//! In-memory media store
//!
//! Records every upload and answers with a synthetic descriptor. Used when
//! `MEDIA_STORE=memory` and by the test suites.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;
use vitrine_core::models::PublishedAsset;
use vitrine_core::StoreBackend;

use crate::traits::{MediaStore, StoreError, StoreResult, UploadOptions};

/// One upload accepted by the memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub options: UploadOptions,
    pub size: usize,
    pub public_id: String,
}

#[derive(Debug, Default)]
struct FailurePlan {
    all: bool,
    file_names: HashSet<String>,
}

/// Memory store implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    uploads: Mutex<Vec<RecordedUpload>>,
    failures: Mutex<FailurePlan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent upload
    pub fn fail_all(&self) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .all = true;
    }

    /// Reject uploads whose original file name is `file_name`
    pub fn fail_file(&self, file_name: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .file_names
            .insert(file_name.into());
    }

    /// Uploads accepted so far, in completion order
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn should_fail(&self, options: &UploadOptions) -> bool {
        let plan = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        plan.all
            || options
                .file_name
                .as_ref()
                .is_some_and(|name| plan.file_names.contains(name))
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn upload_stream(
        &self,
        data: Bytes,
        options: &UploadOptions,
    ) -> StoreResult<PublishedAsset> {
        if self.should_fail(options) {
            let message = format!(
                "Upload of '{}' was rejected",
                options.file_name.as_deref().unwrap_or("file")
            );
            tracing::warn!(folder = %options.folder, error = %message, "Memory store rejected upload");
            return Err(StoreError::Remote {
                status: 400,
                payload: serde_json::json!({ "error": { "message": message.clone() } }),
                message,
            });
        }

        let public_id = format!("{}/{}", options.folder, Uuid::new_v4().simple());
        let resource_type = options.resource_kind.as_str();
        let descriptor = serde_json::json!({
            "public_id": public_id,
            "resource_type": resource_type,
            "folder": options.folder,
            "bytes": data.len(),
            "transformation": options.transformation,
            "original_filename": options.file_name,
            "secure_url": format!("memory://{}/{}", resource_type, public_id),
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedUpload {
                options: options.clone(),
                size: data.len(),
                public_id: public_id.clone(),
            });

        tracing::debug!(public_id = %public_id, size_bytes = data.len(), "Memory store upload recorded");

        Ok(PublishedAsset(descriptor))
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
