//! Upload pipeline: admission gate and in-memory staging, then publishing to
//! the remote media store.

pub mod publisher;
pub mod service;
pub mod stager;
pub mod types;

pub use publisher::MediaPublisher;
pub use service::UploadService;
pub use stager::stage_files;
pub use types::{FileOutcome, StagedFile};
