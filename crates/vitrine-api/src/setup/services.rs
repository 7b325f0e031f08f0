//! Service wiring

use crate::services::upload::MediaPublisher;
use crate::state::{AppState, UploadState};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_storage::MediaStore;

/// Build the application state around an already constructed media store.
pub fn initialize_services(config: &Config, store: Arc<dyn MediaStore>) -> Arc<AppState> {
    let publisher = MediaPublisher::new(store, config.media_folder_root());
    let uploads = UploadState::from_config(config);

    tracing::info!(
        folder_root = %config.media_folder_root(),
        single_max_bytes = uploads.single.max_file_size(),
        multi_max_bytes = uploads.multi.max_file_size(),
        multi_max_files = uploads.multi.max_files(),
        "Upload pipeline ready"
    );

    Arc::new(AppState {
        config: config.clone(),
        publisher,
        uploads,
    })
}
