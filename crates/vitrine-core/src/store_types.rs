use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Remote media store backends
///
/// Defined in core because configuration selects it before the storage crate is involved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Cloudinary,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(StoreBackend::Cloudinary),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid media store backend: {}", s)),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreBackend::Cloudinary => write!(f, "cloudinary"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}
