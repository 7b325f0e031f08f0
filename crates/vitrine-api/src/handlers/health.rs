//! Health and connectivity endpoints

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrine_core::StoreBackend;

use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreBackend,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        store: state.publisher.backend(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[utoipa::path(
    get,
    path = "/api/test",
    tag = "health",
    responses((status = 200, description = "Connectivity check", body = PingResponse))
)]
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        message: "Vitrine backend connected".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment().to_string(),
    })
}

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        endpoints: [
            "POST /api/uploads/single",
            "POST /api/uploads/multiple",
            "GET /api/health",
            "GET /api/test",
            "GET /api/openapi.json",
        ]
        .iter()
        .map(|e| e.to_string())
        .collect(),
    })
}
