//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::constants::SERVICE_NAME;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_infra::LogFormat;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    vitrine_infra::init_telemetry(
        SERVICE_NAME,
        config.environment(),
        LogFormat::for_environment(config.is_production()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = storage::setup_store(&config)?;
    let state = services::initialize_services(&config, store);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
