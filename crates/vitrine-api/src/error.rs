//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every failure of the upload pipeline
//! (classifier, limiter, publisher) renders as `400 { "success": false, "message" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use vitrine_core::{AppError, ErrorMetadata, LogLevel};
use vitrine_processing::UploadError;
use vitrine_storage::StoreError;

pub use vitrine_infra::ErrorResponse;

/// Message used when an error carries no text of its own
pub const DEFAULT_UPLOAD_ERROR_MESSAGE: &str = "Upload error";

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: neither `IntoResponse` nor `AppError` is local to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        HttpAppError(upload_error_to_app_error(err))
    }
}

impl From<StoreError> for HttpAppError {
    fn from(err: StoreError) -> Self {
        HttpAppError(AppError::PublishFailed {
            message: err.to_string(),
            payload: err.payload().cloned(),
        })
    }
}

/// Classify a pipeline error into the application taxonomy. Limiter errors carry a
/// structured message; any other error passes its message through, or the default
/// when it has none.
pub fn upload_error_to_app_error(err: UploadError) -> AppError {
    match err {
        UploadError::Publish { message, payload } => AppError::PublishFailed {
            message: or_default_message(message),
            payload,
        },
        limit if limit.is_limit() => AppError::UploadRejected {
            stage: limit.stage(),
            message: limit.to_string(),
        },
        other => AppError::UploadRejected {
            stage: other.stage(),
            message: or_default_message(other.to_string()),
        },
    }
}

fn or_default_message(message: String) -> String {
    if message.trim().is_empty() {
        DEFAULT_UPLOAD_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let stage = error.upload_stage().map(|s| s.to_string());
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, stage = ?stage, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, stage = ?stage, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, stage = ?stage, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("NODE_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

/// Client-facing message: sensitive details only leave the process outside production.
fn response_message(error: &AppError, is_production: bool) -> String {
    let message = if error.is_sensitive() && !is_production {
        error.detailed_message()
    } else {
        error.client_message()
    };

    if message.trim().is_empty() {
        match error.upload_stage() {
            Some(_) => DEFAULT_UPLOAD_ERROR_MESSAGE.to_string(),
            None => "Internal server error".to_string(),
        }
    } else {
        message
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse::new(response_message(app_error, is_production_env()));
        (status, Json(body)).into_response()
    }
}

/// Client-facing message for one file's failure inside a batch report
pub fn file_error_message(err: &UploadError) -> String {
    or_default_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_processing::{ClassificationError, LimitError};

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn limiter_error_renders_400_with_its_message() {
        let err: HttpAppError = UploadError::from(LimitError::TooManyFilesInField {
            field: vitrine_core::models::UploadField::Images,
            max: 10,
        })
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({
                "success": false,
                "message": "Too many files: field 'images' accepts at most 10"
            })
        );
    }

    #[tokio::test]
    async fn classifier_error_renders_400() {
        let err: HttpAppError = UploadError::from(ClassificationError::NotMedia {
            content_type: "application/pdf".to_string(),
        })
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await["message"],
            "Only images and videos are allowed"
        );
    }

    #[tokio::test]
    async fn store_failure_passes_remote_message_through() {
        let err: HttpAppError = StoreError::Remote {
            status: 400,
            message: "Invalid image file".to_string(),
            payload: serde_json::json!({ "error": { "message": "Invalid image file" } }),
        }
        .into();
        match &err.0 {
            AppError::PublishFailed { payload, .. } => assert!(payload.is_some()),
            other => panic!("Expected PublishFailed, got {:?}", other),
        }
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["message"], "Invalid image file");
    }

    #[test]
    fn empty_messages_fall_back_to_default() {
        let err = AppError::PublishFailed {
            message: String::new(),
            payload: None,
        };
        assert_eq!(response_message(&err, true), DEFAULT_UPLOAD_ERROR_MESSAGE);
        let classified = upload_error_to_app_error(UploadError::Malformed(String::new()));
        assert_eq!(classified.client_message(), DEFAULT_UPLOAD_ERROR_MESSAGE);
        assert_eq!(
            file_error_message(&UploadError::Malformed(" ".to_string())),
            DEFAULT_UPLOAD_ERROR_MESSAGE
        );
    }

    #[test]
    fn internal_details_are_hidden_in_production() {
        let err = AppError::Internal("store client exploded".to_string());
        assert_eq!(response_message(&err, true), "Internal server error");
        assert!(response_message(&err, false).contains("store client exploded"));
    }
}
