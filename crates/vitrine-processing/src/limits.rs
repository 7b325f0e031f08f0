//! Upload limiter
//!
//! Two quota regimes, picked by the endpoint:
//! - single-file: one part under `file`
//! - multi-file: parts under `images` and `videos`, each field with its own count,
//!   plus a combined count across both fields
//!
//! An [`AdmissionTracker`] is created per request and consulted for every file part
//! before any of its bytes are kept.

use std::collections::HashMap;

use vitrine_core::models::{MediaKind, UploadField};
use vitrine_core::UploadLimitsConfig;

use crate::classifier::classify;
use crate::error::{LimitError, UploadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Single,
    Multi,
}

/// Quota set for one upload endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    mode: UploadMode,
    max_file_size: usize,
    max_files: usize,
    fields: Vec<(UploadField, usize)>,
}

impl UploadLimits {
    pub fn single(max_file_size: usize) -> Self {
        Self {
            mode: UploadMode::Single,
            max_file_size,
            max_files: 1,
            fields: vec![(UploadField::File, 1)],
        }
    }

    pub fn multi(max_file_size: usize, max_images: usize, max_videos: usize, max_files: usize) -> Self {
        Self {
            mode: UploadMode::Multi,
            max_file_size,
            max_files,
            fields: vec![
                (UploadField::Images, max_images),
                (UploadField::Videos, max_videos),
            ],
        }
    }

    pub fn from_config(mode: UploadMode, config: &UploadLimitsConfig) -> Self {
        match mode {
            UploadMode::Single => Self::single(config.single_max_bytes),
            UploadMode::Multi => Self::multi(
                config.multi_max_bytes,
                config.multi_max_images,
                config.multi_max_videos,
                config.multi_max_files,
            ),
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Maximum part count for `field`, `None` when the field is not accepted here
    pub fn quota_for(&self, field: UploadField) -> Option<usize> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, max)| *max)
    }

    pub fn tracker(&self) -> AdmissionTracker<'_> {
        AdmissionTracker {
            limits: self,
            per_field: HashMap::new(),
            total: 0,
        }
    }
}

/// Outcome of admitting one file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub field: UploadField,
    pub kind: MediaKind,
    /// Declared content type, as accepted by the classifier
    pub content_type: String,
}

/// Per-request admission state
#[derive(Debug)]
pub struct AdmissionTracker<'a> {
    limits: &'a UploadLimits,
    per_field: HashMap<UploadField, usize>,
    total: usize,
}

impl AdmissionTracker<'_> {
    /// Admit a new file part: field name, per-field count, combined count, then
    /// content type, in that order.
    pub fn admit(&mut self, field_name: &str, content_type: &str) -> Result<Admission, UploadError> {
        let field = UploadField::from_name(field_name)
            .filter(|f| self.limits.quota_for(*f).is_some())
            .ok_or_else(|| LimitError::UnexpectedField {
                field: field_name.to_string(),
            })?;

        let max_in_field = self.limits.quota_for(field).unwrap_or(0);
        let in_field = self.per_field.get(&field).copied().unwrap_or(0);
        if in_field >= max_in_field {
            return Err(match self.limits.mode {
                // A second `file` part in single mode is just an unexpected extra part
                UploadMode::Single => LimitError::UnexpectedField {
                    field: field_name.to_string(),
                },
                UploadMode::Multi => LimitError::TooManyFilesInField {
                    field,
                    max: max_in_field,
                },
            }
            .into());
        }

        if self.total >= self.limits.max_files {
            return Err(LimitError::TooManyFiles {
                max: self.limits.max_files,
            }
            .into());
        }

        let kind = classify(content_type)?;

        self.per_field.insert(field, in_field + 1);
        self.total += 1;

        tracing::debug!(
            field = %field,
            kind = %kind,
            content_type = %content_type,
            admitted = self.total,
            "File part admitted"
        );

        Ok(Admission {
            field,
            kind,
            content_type: content_type.to_string(),
        })
    }

    /// Check the running size of a part while its bytes arrive.
    pub fn check_size(&self, field: UploadField, received: usize) -> Result<(), LimitError> {
        if received > self.limits.max_file_size {
            return Err(LimitError::FileTooLarge {
                field,
                max_bytes: self.limits.max_file_size,
            });
        }
        Ok(())
    }

    /// Check a part once all of its bytes have arrived.
    pub fn check_complete(&self, field: UploadField, size: usize) -> Result<(), LimitError> {
        if size == 0 {
            return Err(LimitError::EmptyFile { field });
        }
        self.check_size(field, size)
    }

    pub fn admitted(&self) -> usize {
        self.total
    }

    /// Close admission for the request. A request without any file part is rejected
    /// in both modes.
    pub fn finish(self) -> Result<usize, LimitError> {
        if self.total == 0 {
            return Err(LimitError::NoFile);
        }
        Ok(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassificationError;
    use vitrine_core::constants::MIB;

    fn single() -> UploadLimits {
        UploadLimits::from_config(UploadMode::Single, &UploadLimitsConfig::default())
    }

    fn multi() -> UploadLimits {
        UploadLimits::from_config(UploadMode::Multi, &UploadLimitsConfig::default())
    }

    #[test]
    fn default_quotas() {
        let single = single();
        assert_eq!(single.max_file_size(), 5 * MIB);
        assert_eq!(single.quota_for(UploadField::File), Some(1));
        assert_eq!(single.quota_for(UploadField::Images), None);

        let multi = multi();
        assert_eq!(multi.max_file_size(), 50 * MIB);
        assert_eq!(multi.quota_for(UploadField::Images), Some(10));
        assert_eq!(multi.quota_for(UploadField::Videos), Some(5));
        assert_eq!(multi.max_files(), 15);
    }

    #[test]
    fn single_mode_rejects_files_over_5_mib() {
        let limits = single();
        let tracker = limits.tracker();
        assert!(tracker.check_size(UploadField::File, 5 * MIB).is_ok());
        let err = tracker.check_size(UploadField::File, 6 * MIB).unwrap_err();
        assert!(matches!(err, LimitError::FileTooLarge { .. }));
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn single_mode_accepts_one_file_only() {
        let limits = single();
        let mut tracker = limits.tracker();
        let admission = tracker.admit("file", "image/png").unwrap();
        assert_eq!(admission.field, UploadField::File);
        assert_eq!(admission.kind, MediaKind::Image);

        let err = tracker.admit("file", "image/png").unwrap_err();
        assert!(matches!(
            err,
            UploadError::Limit(LimitError::UnexpectedField { .. })
        ));
        assert_eq!(tracker.finish().unwrap(), 1);
    }

    #[test]
    fn single_mode_requires_a_file() {
        let limits = single();
        let tracker = limits.tracker();
        assert_eq!(tracker.finish().unwrap_err(), LimitError::NoFile);
    }

    #[test]
    fn multi_mode_requires_at_least_one_file() {
        let limits = multi();
        assert_eq!(limits.tracker().finish().unwrap_err(), LimitError::NoFile);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let limits = multi();
        let mut tracker = limits.tracker();
        let err = tracker.admit("file", "image/png").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected field: 'file'");

        let limits = single();
        let mut tracker = limits.tracker();
        assert!(tracker.admit("images", "image/png").is_err());
    }

    #[test]
    fn multi_mode_rejects_any_file_over_50_mib() {
        let limits = multi();
        let tracker = limits.tracker();
        assert!(tracker.check_size(UploadField::Videos, 50 * MIB).is_ok());
        assert!(tracker.check_size(UploadField::Videos, 50 * MIB + 1).is_err());
        assert!(tracker.check_size(UploadField::Images, 50 * MIB + 1).is_err());
    }

    #[test]
    fn eleventh_image_is_rejected_with_count_message() {
        let limits = multi();
        let mut tracker = limits.tracker();
        for _ in 0..10 {
            tracker.admit("images", "image/jpeg").unwrap();
        }
        let err = tracker.admit("images", "image/jpeg").unwrap_err();
        assert_eq!(
            err,
            UploadError::Limit(LimitError::TooManyFilesInField {
                field: UploadField::Images,
                max: 10
            })
        );
        assert!(err.to_string().starts_with("Too many files"));
    }

    #[test]
    fn sixth_video_is_rejected() {
        let limits = multi();
        let mut tracker = limits.tracker();
        for _ in 0..5 {
            tracker.admit("videos", "video/mp4").unwrap();
        }
        assert!(matches!(
            tracker.admit("videos", "video/mp4"),
            Err(UploadError::Limit(LimitError::TooManyFilesInField { .. }))
        ));
    }

    #[test]
    fn combined_count_is_enforced_even_when_fields_are_within_quota() {
        let limits = UploadLimits::multi(50 * MIB, 10, 5, 12);
        let mut tracker = limits.tracker();
        for _ in 0..8 {
            tracker.admit("images", "image/png").unwrap();
        }
        for _ in 0..4 {
            tracker.admit("videos", "video/webm").unwrap();
        }
        let err = tracker.admit("videos", "video/webm").unwrap_err();
        assert_eq!(
            err,
            UploadError::Limit(LimitError::TooManyFiles { max: 12 })
        );
        assert_eq!(tracker.admitted(), 12);
    }

    #[test]
    fn classification_failures_do_not_consume_quota() {
        let limits = multi();
        let mut tracker = limits.tracker();
        let err = tracker.admit("images", "image/gif").unwrap_err();
        assert!(matches!(
            err,
            UploadError::Classification(ClassificationError::UnsupportedImage { .. })
        ));
        assert_eq!(tracker.admitted(), 0);
    }

    #[test]
    fn empty_files_are_rejected() {
        let limits = multi();
        let tracker = limits.tracker();
        assert_eq!(
            tracker.check_complete(UploadField::Images, 0).unwrap_err(),
            LimitError::EmptyFile {
                field: UploadField::Images
            }
        );
        assert!(tracker.check_complete(UploadField::Images, 1).is_ok());
    }

    #[test]
    fn admission_keeps_declared_content_type() {
        let limits = multi();
        let mut tracker = limits.tracker();
        let admission = tracker.admit("videos", "video/webm").unwrap();
        assert_eq!(admission.content_type, "video/webm");
        assert_eq!(admission.kind, MediaKind::Video);

        let err = tracker.admit("videos", "Video/MP4; codecs=avc1").unwrap_err();
        assert_eq!(err.to_string(), "Only images and videos are allowed");
        assert_eq!(tracker.admitted(), 1);
    }
}
