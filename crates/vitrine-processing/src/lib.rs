//! Vitrine Processing Library
//!
//! Admission gate of the upload pipeline: the media type classifier and the
//! upload limiter, plus the error taxonomy shared by every pipeline stage.

pub mod classifier;
pub mod error;
pub mod limits;

pub use classifier::{
    classify, SUPPORTED_IMAGE_TYPES, SUPPORTED_VIDEO_TYPES,
};
pub use error::{ClassificationError, LimitError, UploadError};
pub use limits::{Admission, AdmissionTracker, UploadLimits, UploadMode};
