use vitrine_core::constants::MIB;
use vitrine_core::models::{UploadField, UploadStage};

/// Content type rejected by the classifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("Unsupported image format (JPEG, JPG, PNG, WEBP)")]
    UnsupportedImage { content_type: String },

    #[error("Unsupported video format (MP4, MOV, AVI, WEBM)")]
    UnsupportedVideo { content_type: String },

    #[error("Only images and videos are allowed")]
    NotMedia { content_type: String },
}

/// Size or count quota exceeded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitError {
    #[error("File too large: files in '{field}' must not exceed {}", describe_size(*.max_bytes))]
    FileTooLarge { field: UploadField, max_bytes: usize },

    #[error("Too many files: field '{field}' accepts at most {max}")]
    TooManyFilesInField { field: UploadField, max: usize },

    #[error("Too many files: at most {max} files per request")]
    TooManyFiles { max: usize },

    #[error("Unexpected field: '{field}'")]
    UnexpectedField { field: String },

    #[error("Empty file in field '{field}'")]
    EmptyFile { field: UploadField },

    #[error("No file provided")]
    NoFile,

    #[error("Request too large")]
    RequestTooLarge,
}

fn describe_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Failure of any stage of the upload pipeline
///
/// Every variant is terminal for the file or request it concerns; nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Limit(#[from] LimitError),

    /// The remote store reported a failure; `payload` is its error body verbatim
    #[error("{message}")]
    Publish {
        message: String,
        payload: Option<serde_json::Value>,
    },

    /// The inbound multipart stream could not be read
    #[error("{0}")]
    Malformed(String),
}

impl UploadError {
    pub fn stage(&self) -> UploadStage {
        match self {
            UploadError::Classification(_) => UploadStage::Classifier,
            UploadError::Limit(_) | UploadError::Malformed(_) => UploadStage::Limiter,
            UploadError::Publish { .. } => UploadStage::Publisher,
        }
    }

    /// Raised by the limiter with a known kind (as opposed to free-form failures)
    pub fn is_limit(&self) -> bool {
        matches!(self, UploadError::Limit(_))
    }
}
