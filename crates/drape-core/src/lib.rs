//! Drape Core Library
//!
//! Domain models, the category classifier, error types and configuration shared
//! by every drape component.

pub mod category;
pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use category::{Category, CategoryEntry, CategoryTable, Classification};
pub use config::{BaseConfig, Config, GarmentServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{LoggingReadyNotifier, ReadyNotifier};
pub use storage_types::{StateBackend, StorageBackend};
