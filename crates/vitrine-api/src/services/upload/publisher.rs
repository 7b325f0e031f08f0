//! Remote media publisher

use std::sync::Arc;

use vitrine_core::models::{PublishTarget, PublishedAsset};
use vitrine_processing::UploadError;
use vitrine_storage::{MediaStore, StoreBackend, StoreError, UploadOptions};

use super::types::StagedFile;

/// Publishes staged files to the configured remote store
///
/// The store handle and folder root are injected at construction; nothing is read
/// from process-wide state.
#[derive(Clone)]
pub struct MediaPublisher {
    store: Arc<dyn MediaStore>,
    folder_root: String,
}

impl MediaPublisher {
    pub fn new(store: Arc<dyn MediaStore>, folder_root: impl Into<String>) -> Self {
        Self {
            store,
            folder_root: folder_root.into(),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        self.store.backend_type()
    }

    /// Destination of a staged file: by field name for `images`/`videos`, by
    /// classified kind for the single-file field.
    pub fn target_for(&self, staged: &StagedFile) -> PublishTarget {
        PublishTarget::for_field(staged.field, staged.kind, &self.folder_root)
    }

    /// One upload session per call. A store failure is terminal and carries the
    /// store's error payload unchanged.
    pub async fn publish(
        &self,
        staged: StagedFile,
        target: &PublishTarget,
    ) -> Result<PublishedAsset, UploadError> {
        let options = UploadOptions::for_target(target, &staged.content_type, staged.file_name);
        let size = staged.data.len();

        tracing::info!(
            field = %staged.field,
            folder = %options.folder,
            resource_kind = %options.resource_kind,
            size_bytes = size,
            "Publishing file"
        );

        // `staged.data` moves into the store call and is dropped when it resolves
        match self.store.upload_stream(staged.data, &options).await {
            Ok(asset) => {
                tracing::info!(
                    folder = %options.folder,
                    public_id = asset.public_id().unwrap_or("unknown"),
                    size_bytes = size,
                    "File published"
                );
                Ok(asset)
            }
            Err(err) => {
                tracing::warn!(folder = %options.folder, error = %err, "Publish failed");
                Err(publish_error(err))
            }
        }
    }
}

fn publish_error(err: StoreError) -> UploadError {
    UploadError::Publish {
        message: err.to_string(),
        payload: err.payload().cloned(),
    }
}
