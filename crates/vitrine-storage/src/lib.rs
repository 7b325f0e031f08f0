//! Vitrine Storage Library
//!
//! Abstraction over the remote media store that hosts and transforms product
//! images and videos, with a Cloudinary backend and an in-memory backend.
//!
//! Nothing in this crate writes to local disk: payloads arrive as in-memory
//! buffers and leave over the network.

pub mod factory;
#[cfg(feature = "store-cloudinary")]
pub mod cloudinary;
#[cfg(feature = "store-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "store-cloudinary")]
pub use cloudinary::CloudinaryStore;
pub use factory::create_store;
#[cfg(feature = "store-memory")]
pub use memory::{MemoryStore, RecordedUpload};
pub use traits::{MediaStore, StoreError, StoreResult, UploadOptions};
pub use vitrine_core::StoreBackend;
