//! Application state shared by every handler

use vitrine_core::Config;
use vitrine_processing::{UploadLimits, UploadMode};

use crate::services::upload::MediaPublisher;

/// Quotas of both upload regimes, fixed at startup
#[derive(Clone, Debug)]
pub struct UploadState {
    pub single: UploadLimits,
    pub multi: UploadLimits,
}

impl UploadState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            single: UploadLimits::from_config(UploadMode::Single, config.upload_limits()),
            multi: UploadLimits::from_config(UploadMode::Multi, config.upload_limits()),
        }
    }
}

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub publisher: MediaPublisher,
    pub uploads: UploadState,
}
