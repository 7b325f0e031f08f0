//! Types used by the upload pipeline

use bytes::Bytes;
use vitrine_core::models::{MediaKind, PublishedAsset, UploadField};
use vitrine_processing::UploadError;

/// Admitted file whose whole payload is held in memory
///
/// Consumed by the publisher, so the buffer is released as soon as its publish
/// attempt resolves.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub field: UploadField,
    /// Position of the part within its field, starting at 0
    pub index: usize,
    pub kind: MediaKind,
    /// Declared content type
    pub content_type: String,
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl StagedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Publish outcome of one file of a multi-file request
#[derive(Debug)]
pub struct FileOutcome {
    pub field: UploadField,
    pub index: usize,
    pub file_name: Option<String>,
    pub result: Result<PublishedAsset, UploadError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
