//! Drape API Library
//!
//! HTTP transport, the completion coordinator and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::ErrorResponse;
pub use services::{CompletionCoordinator, CoordinatorDeps, UploadOutcome, UploadRequest};
