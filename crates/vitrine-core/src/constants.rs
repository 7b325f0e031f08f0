//! Constants shared across crates.

/// One mebibyte, the unit every upload ceiling is expressed in.
pub const MIB: usize = 1024 * 1024;

/// Ceiling for a single-file upload (field `file`).
pub const SINGLE_UPLOAD_MAX_BYTES: usize = 5 * MIB;

/// Ceiling for each file of a multi-file upload.
pub const MULTI_UPLOAD_MAX_BYTES: usize = 50 * MIB;

/// Maximum number of parts under the `images` field.
pub const MULTI_UPLOAD_MAX_IMAGES: usize = 10;

/// Maximum number of parts under the `videos` field.
pub const MULTI_UPLOAD_MAX_VIDEOS: usize = 5;

/// Maximum combined file count of a multi-file upload.
pub const MULTI_UPLOAD_MAX_FILES: usize = 15;

/// Root folder on the remote store; products live below it.
pub const DEFAULT_MEDIA_FOLDER_ROOT: &str = "nono-vitrine";

/// Longest edge for published product images.
pub const IMAGE_BOUNDING_BOX: u32 = 800;

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";
