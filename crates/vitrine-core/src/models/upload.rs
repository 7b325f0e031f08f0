//! Upload domain models: media kinds, multipart fields, publish targets and
//! the descriptors returned by the remote store.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::IMAGE_BOUNDING_BOX;

/// Kind of media accepted by the upload pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Resource type understood by the remote store
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Multipart field names recognised by the upload endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadField {
    /// Single-file mode
    File,
    Images,
    Videos,
}

impl UploadField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "file" => Some(UploadField::File),
            "images" => Some(UploadField::Images),
            "videos" => Some(UploadField::Videos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadField::File => "file",
            UploadField::Images => "images",
            UploadField::Videos => "videos",
        }
    }
}

impl Display for UploadField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage an upload error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Classifier,
    Limiter,
    Publisher,
}

impl Display for UploadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStage::Classifier => f.write_str("classifier"),
            UploadStage::Limiter => f.write_str("limiter"),
            UploadStage::Publisher => f.write_str("publisher"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    /// Shrink to fit inside the box, never upscale
    Limit,
}

impl CropMode {
    fn code(&self) -> &'static str {
        match self {
            CropMode::Limit => "limit",
        }
    }
}

/// One transformation directive applied by the remote store on ingest
///
/// Rendered with [`Transformation::to_component`] as a comma-separated list of
/// `key_value` pairs sorted by key, the form the store's upload API expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<CropMode>,
    /// `q_auto`
    pub auto_quality: bool,
    /// `f_auto`
    pub auto_format: bool,
}

impl Transformation {
    /// Resize within `width`x`height` without upscaling, with automatic quality.
    pub fn bounded(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            crop: Some(CropMode::Limit),
            auto_quality: true,
            auto_format: false,
        }
    }

    pub fn auto_quality() -> Self {
        Self {
            auto_quality: true,
            ..Self::default()
        }
    }

    pub fn auto_format() -> Self {
        Self {
            auto_format: true,
            ..Self::default()
        }
    }

    pub fn to_component(&self) -> String {
        let mut parts = Vec::with_capacity(5);
        if let Some(crop) = self.crop {
            parts.push(format!("c_{}", crop.code()));
        }
        if self.auto_format {
            parts.push("f_auto".to_string());
        }
        if let Some(height) = self.height {
            parts.push(format!("h_{}", height));
        }
        if self.auto_quality {
            parts.push("q_auto".to_string());
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{}", width));
        }
        parts.join(",")
    }
}

/// Destination of a remote store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub folder: String,
    pub kind: MediaKind,
    pub transformations: Vec<Transformation>,
}

impl PublishTarget {
    /// `{root}/products/images`, bounded to 800x800 ("limit"), automatic quality then format.
    pub fn images(folder_root: &str) -> Self {
        Self {
            folder: format!("{}/products/images", folder_root.trim_end_matches('/')),
            kind: MediaKind::Image,
            transformations: vec![
                Transformation::bounded(IMAGE_BOUNDING_BOX, IMAGE_BOUNDING_BOX),
                Transformation::auto_format(),
            ],
        }
    }

    /// `{root}/products/videos`, automatic quality only.
    pub fn videos(folder_root: &str) -> Self {
        Self {
            folder: format!("{}/products/videos", folder_root.trim_end_matches('/')),
            kind: MediaKind::Video,
            transformations: vec![Transformation::auto_quality()],
        }
    }

    pub fn for_kind(kind: MediaKind, folder_root: &str) -> Self {
        match kind {
            MediaKind::Image => Self::images(folder_root),
            MediaKind::Video => Self::videos(folder_root),
        }
    }

    /// Target for a multipart field. `images` and `videos` are fixed by name; the
    /// single-file field follows the classified kind of its payload.
    pub fn for_field(field: UploadField, kind: MediaKind, folder_root: &str) -> Self {
        match field {
            UploadField::Images => Self::images(folder_root),
            UploadField::Videos => Self::videos(folder_root),
            UploadField::File => Self::for_kind(kind, folder_root),
        }
    }

    /// Chained transformation string, components separated by `/`.
    pub fn transformation_string(&self) -> String {
        self.transformations
            .iter()
            .map(Transformation::to_component)
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Descriptor returned by the remote store for a published file
///
/// Passed back to clients exactly as the store produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct PublishedAsset(pub serde_json::Value);

impl PublishedAsset {
    pub fn public_id(&self) -> Option<&str> {
        self.0.get("public_id").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_target_bounds_to_800_limit_with_auto_quality_and_format() {
        let target = PublishTarget::images("nono-vitrine");
        assert_eq!(target.folder, "nono-vitrine/products/images");
        assert_eq!(target.kind, MediaKind::Image);
        assert_eq!(
            target.transformation_string(),
            "c_limit,h_800,q_auto,w_800/f_auto"
        );
    }

    #[test]
    fn video_target_only_sets_auto_quality() {
        let target = PublishTarget::videos("nono-vitrine/");
        assert_eq!(target.folder, "nono-vitrine/products/videos");
        assert_eq!(target.kind, MediaKind::Video);
        assert_eq!(target.transformations, vec![Transformation::auto_quality()]);
        assert_eq!(target.transformation_string(), "q_auto");
    }

    #[test]
    fn single_file_target_follows_classified_kind() {
        let image = PublishTarget::for_field(UploadField::File, MediaKind::Image, "root");
        let video = PublishTarget::for_field(UploadField::File, MediaKind::Video, "root");
        assert_eq!(image.folder, "root/products/images");
        assert_eq!(video.folder, "root/products/videos");
    }

    #[test]
    fn named_fields_pick_target_by_name() {
        let target = PublishTarget::for_field(UploadField::Videos, MediaKind::Image, "root");
        assert_eq!(target.kind, MediaKind::Video);
    }

    #[test]
    fn empty_components_are_dropped_from_the_chain() {
        let target = PublishTarget {
            folder: "root/products/images".to_string(),
            kind: MediaKind::Image,
            transformations: vec![Transformation::default(), Transformation::auto_format()],
        };
        assert_eq!(target.transformation_string(), "f_auto");
    }

    #[test]
    fn field_names_round_trip() {
        for field in [UploadField::File, UploadField::Images, UploadField::Videos] {
            assert_eq!(UploadField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(UploadField::from_name("avatar"), None);
    }

    #[test]
    fn published_asset_serializes_as_the_store_descriptor() {
        let asset = PublishedAsset(serde_json::json!({
            "public_id": "nono-vitrine/products/images/abc",
            "secure_url": "https://res.example.com/abc.jpg",
        }));
        assert_eq!(asset.public_id(), Some("nono-vitrine/products/images/abc"));
        assert_eq!(
            serde_json::to_value(&asset).unwrap()["secure_url"],
            "https://res.example.com/abc.jpg"
        );
    }
}
