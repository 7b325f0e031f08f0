//! Upload workflows: stage everything, then publish

use axum::extract::Multipart;
use futures::future::join_all;
use vitrine_core::models::PublishedAsset;
use vitrine_processing::{UploadError, UploadLimits};

use super::publisher::MediaPublisher;
use super::stager::stage_files;
use super::types::{FileOutcome, StagedFile};

/// Upload workflow service
pub struct UploadService<'a> {
    publisher: &'a MediaPublisher,
}

impl<'a> UploadService<'a> {
    pub fn new(publisher: &'a MediaPublisher) -> Self {
        Self { publisher }
    }

    /// Single-file mode: admit exactly one `file` part and publish it.
    pub async fn upload_single(
        &self,
        mut multipart: Multipart,
        limits: &UploadLimits,
    ) -> Result<PublishedAsset, UploadError> {
        let staged = stage_files(&mut multipart, limits).await?;
        let Some(file) = staged.into_iter().next() else {
            return Err(vitrine_processing::LimitError::NoFile.into());
        };
        let target = self.publisher.target_for(&file);
        self.publisher.publish(file, &target).await
    }

    /// Multi-file mode: admit the whole batch, then publish every file
    /// concurrently. Each file gets its own outcome; successes are kept when
    /// siblings fail.
    pub async fn upload_multiple(
        &self,
        mut multipart: Multipart,
        limits: &UploadLimits,
    ) -> Result<Vec<FileOutcome>, UploadError> {
        let staged = stage_files(&mut multipart, limits).await?;
        tracing::info!(files = staged.len(), "Batch admitted, publishing");
        Ok(self.publish_all(staged).await)
    }

    pub async fn publish_all(&self, staged: Vec<StagedFile>) -> Vec<FileOutcome> {
        let publishes = staged.into_iter().map(|file| async move {
            let field = file.field;
            let index = file.index;
            let file_name = file.file_name.clone();
            let target = self.publisher.target_for(&file);
            let result = self.publisher.publish(file, &target).await;
            FileOutcome {
                field,
                index,
                file_name,
                result,
            }
        });

        let outcomes = join_all(publishes).await;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        if failed > 0 {
            tracing::warn!(
                total = outcomes.len(),
                failed,
                "Batch published with failures"
            );
        }
        outcomes
    }
}
