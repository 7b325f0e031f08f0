//! Remote media store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_storage::{create_store, MediaStore};

pub fn setup_store(config: &Config) -> Result<Arc<dyn MediaStore>> {
    let store = create_store(config).context("Failed to initialize media store")?;

    tracing::info!(
        backend = %store.backend_type(),
        cloud_name = ?config.cloudinary().map(|c| c.cloud_name.as_str()),
        "Media store initialized"
    );

    Ok(store)
}
