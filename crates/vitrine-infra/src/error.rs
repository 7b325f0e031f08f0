//! HTTP error response body
//!
//! The `IntoResponse` implementation for `AppError` lives in vitrine-api: neither
//! the trait nor the type is local to this crate.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_failure_envelope() {
        let body = serde_json::to_value(ErrorResponse::new("No file provided")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "No file provided" })
        );
    }
}
