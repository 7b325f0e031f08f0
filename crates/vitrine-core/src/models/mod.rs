pub mod upload;

pub use upload::{
    CropMode, MediaKind, PublishTarget, PublishedAsset, Transformation, UploadField, UploadStage,
};
