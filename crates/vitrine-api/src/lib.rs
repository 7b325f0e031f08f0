//! Vitrine API Library
//!
//! HTTP handlers, upload pipeline services and application setup.

mod api_doc;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use handlers::upload::{BatchUploadResponse, BatchUploadResult, SingleUploadResponse};
