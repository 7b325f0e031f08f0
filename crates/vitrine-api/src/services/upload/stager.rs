//! Multipart reader that admits and buffers file parts
//!
//! Every part passes the admission gate before any of its bytes are kept. The
//! whole request is read before anything is published, so a rejected part
//! fails the request without a single publish call.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use vitrine_core::models::UploadField;
use vitrine_processing::{LimitError, UploadError, UploadLimits};

use super::types::StagedFile;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Read every part of `multipart`, admitting file parts against `limits`.
///
/// Parts without a file name (or with an empty one, as browsers send for an
/// unused file input) are plain form fields and are skipped.
pub async fn stage_files(
    multipart: &mut Multipart,
    limits: &UploadLimits,
) -> Result<Vec<StagedFile>, UploadError> {
    let mut tracker = limits.tracker();
    let mut staged = Vec::new();
    let mut per_field_index: HashMap<UploadField, usize> = HashMap::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, None, limits, "Failed to read multipart"))?
    {
        let Some(file_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        let declared_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let admission = tracker.admit(&field_name, &declared_type)?;

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| read_error(e, Some(admission.field), limits, "Failed to read file data"))?
        {
            tracker.check_size(admission.field, buffer.len() + chunk.len())?;
            buffer.extend_from_slice(&chunk);
        }
        tracker.check_complete(admission.field, buffer.len())?;

        let index = per_field_index.entry(admission.field).or_insert(0);
        let file = StagedFile {
            field: admission.field,
            index: *index,
            kind: admission.kind,
            content_type: admission.content_type,
            file_name: Some(file_name),
            data: buffer.freeze(),
        };
        *index += 1;

        tracing::debug!(
            field = %file.field,
            index = file.index,
            content_type = %file.content_type,
            size_bytes = file.size(),
            "File staged"
        );
        staged.push(file);
    }

    tracker.finish()?;
    Ok(staged)
}

/// Map a multipart read failure. Hitting the route's body cap while a file part
/// streams in is reported as that part being too large.
fn read_error(
    error: MultipartError,
    field: Option<UploadField>,
    limits: &UploadLimits,
    context: &str,
) -> UploadError {
    if error.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::Malformed(format!("{}: {}", context, error));
    }
    match field {
        Some(field) => LimitError::FileTooLarge {
            field,
            max_bytes: limits.max_file_size(),
        }
        .into(),
        None => LimitError::RequestTooLarge.into(),
    }
}
