//! Vitrine Core Library
//!
//! This crate provides the configuration, error types and upload domain models
//! shared by every Vitrine component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod store_types;

// Re-export commonly used types
pub use config::{BaseConfig, CloudinaryConfig, Config, MediaServiceConfig, UploadLimitsConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use store_types::StoreBackend;
