//! Upload handlers: single product image/video and multi-file product galleries.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrine_core::models::{PublishedAsset, UploadField};

use crate::error::{file_error_message, ErrorResponse, HttpAppError};
use crate::services::upload::{FileOutcome, UploadService};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SingleUploadResponse {
    pub success: bool,
    /// Descriptor returned by the media store, unchanged
    pub asset: PublishedAsset,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchUploadResponse {
    /// True only when every file was published
    pub success: bool,
    pub message: String,
    pub uploaded: usize,
    pub failed: usize,
    pub results: Vec<BatchUploadResult>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchUploadResult {
    pub field: UploadField,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<PublishedAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<FileOutcome> for BatchUploadResult {
    fn from(outcome: FileOutcome) -> Self {
        let (status, asset, error) = match outcome.result {
            Ok(asset) => (StatusCode::CREATED.as_u16(), Some(asset), None),
            Err(err) => (
                StatusCode::BAD_REQUEST.as_u16(),
                None,
                Some(file_error_message(&err)),
            ),
        };
        Self {
            field: outcome.field,
            index: outcome.index,
            file_name: outcome.file_name,
            status,
            asset,
            error,
        }
    }
}

impl BatchUploadResponse {
    pub fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        let results: Vec<BatchUploadResult> =
            outcomes.into_iter().map(BatchUploadResult::from).collect();
        let uploaded = results.iter().filter(|r| r.asset.is_some()).count();
        let failed = results.len() - uploaded;
        let message = if failed == 0 {
            format!("{} file(s) uploaded", uploaded)
        } else {
            format!("{} of {} file(s) failed to upload", failed, results.len())
        };

        Self {
            success: failed == 0,
            message,
            uploaded,
            failed,
            results,
        }
    }

    /// 201 when anything was published, 400 when every file failed
    pub fn status_code(&self) -> StatusCode {
        if self.uploaded > 0 {
            StatusCode::CREATED
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

/// Upload a single image or video
///
/// The file is read from the `file` field, checked against the single-file quota
/// (one file, 5 MB) and published to the image or video folder depending on its type.
#[utoipa::path(
    post,
    path = "/api/uploads/single",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = SingleUploadResponse),
        (status = 400, description = "Rejected or failed upload", body = ErrorResponse),
        (status = 413, description = "Request body too large"),
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_single"))]
pub async fn upload_single(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let service = UploadService::new(&state.publisher);
    let asset = service
        .upload_single(multipart, &state.uploads.single)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SingleUploadResponse {
            success: true,
            asset,
        }),
    ))
}

/// Upload product images and videos in one request
///
/// Accepts up to 10 files in `images` and 5 in `videos` (15 in total, 50 MB each).
/// The whole batch is admitted before anything is published; each file is then
/// published independently and reported on its own.
#[utoipa::path(
    post,
    path = "/api/uploads/multiple",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "At least one file uploaded", body = BatchUploadResponse),
        (status = 400, description = "Rejected batch, or every file failed", body = ErrorResponse),
        (status = 413, description = "Request body too large"),
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_multiple"))]
pub async fn upload_multiple(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let service = UploadService::new(&state.publisher);
    let outcomes = service
        .upload_multiple(multipart, &state.uploads.multi)
        .await?;

    let response = BatchUploadResponse::from_outcomes(outcomes);
    tracing::info!(
        uploaded = response.uploaded,
        failed = response.failed,
        "Multi-file upload completed"
    );
    Ok((response.status_code(), Json(response)))
}
