//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Upload routes live under this prefix
pub const UPLOADS_PREFIX: &str = "/api/uploads";

pub const SERVICE_NAME: &str = "vitrine-api";

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
