//! Media type classifier
//!
//! Decides from the declared content type alone whether a part is an acceptable
//! image or video. The declared string is matched exactly (case and parameters
//! included) and the payload is never sniffed.

use vitrine_core::models::MediaKind;

use crate::error::ClassificationError;

/// Image content types accepted for upload
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Video content types accepted for upload
pub const SUPPORTED_VIDEO_TYPES: [&str; 4] = ["video/mp4", "video/mov", "video/avi", "video/webm"];

/// Classify a declared content type.
pub fn classify(content_type: &str) -> Result<MediaKind, ClassificationError> {
    if content_type.starts_with("image/") {
        if SUPPORTED_IMAGE_TYPES.contains(&content_type) {
            return Ok(MediaKind::Image);
        }
        return Err(ClassificationError::UnsupportedImage {
            content_type: content_type.to_string(),
        });
    }

    if content_type.starts_with("video/") {
        if SUPPORTED_VIDEO_TYPES.contains(&content_type) {
            return Ok(MediaKind::Video);
        }
        return Err(ClassificationError::UnsupportedVideo {
            content_type: content_type.to_string(),
        });
    }

    Err(ClassificationError::NotMedia {
        content_type: content_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_MESSAGE: &str = "Unsupported image format (JPEG, JPG, PNG, WEBP)";
    const VIDEO_MESSAGE: &str = "Unsupported video format (MP4, MOV, AVI, WEBM)";
    const GENERIC_MESSAGE: &str = "Only images and videos are allowed";

    #[test]
    fn accepts_supported_images() {
        for ct in SUPPORTED_IMAGE_TYPES {
            assert_eq!(classify(ct).unwrap(), MediaKind::Image, "{ct}");
        }
    }

    #[test]
    fn accepts_supported_videos() {
        for ct in SUPPORTED_VIDEO_TYPES {
            assert_eq!(classify(ct).unwrap(), MediaKind::Video, "{ct}");
        }
    }

    #[test]
    fn rejects_other_image_subtypes_with_image_message() {
        for ct in [
            "image/gif",
            "image/svg+xml",
            "image/avif",
            "image/bmp",
            "image/heic",
            "image/",
            "image/jpeg2000",
        ] {
            let err = classify(ct).unwrap_err();
            assert_eq!(err.to_string(), IMAGE_MESSAGE, "{ct}");
        }
    }

    #[test]
    fn rejects_other_video_subtypes_with_video_message() {
        for ct in [
            "video/quicktime",
            "video/x-msvideo",
            "video/x-matroska",
            "video/ogg",
            "video/mp4v",
        ] {
            let err = classify(ct).unwrap_err();
            assert_eq!(err.to_string(), VIDEO_MESSAGE, "{ct}");
        }
    }

    #[test]
    fn rejects_everything_else_with_generic_message() {
        for ct in [
            "application/pdf",
            "application/octet-stream",
            "text/plain",
            "audio/mpeg",
            "",
            "imagejpeg",
            "x-image/png",
        ] {
            let err = classify(ct).unwrap_err();
            assert_eq!(err.to_string(), GENERIC_MESSAGE, "{ct:?}");
        }
    }

    #[test]
    fn matches_declared_type_exactly() {
        assert_eq!(classify("IMAGE/PNG").unwrap_err().to_string(), GENERIC_MESSAGE);
        assert_eq!(classify(" video/mp4").unwrap_err().to_string(), GENERIC_MESSAGE);
        assert_eq!(
            classify("image/webp; charset=binary").unwrap_err().to_string(),
            IMAGE_MESSAGE
        );
        assert_eq!(classify("video/mp4 ").unwrap_err().to_string(), VIDEO_MESSAGE);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        for ct in ["image/png", "image/gif", "video/webm", "text/html"] {
            let first = classify(ct).map_err(|e| e.to_string());
            let second = classify(ct).map_err(|e| e.to_string());
            assert_eq!(first, second);
        }
    }
}
