//! Error types module
//!
//! All failures of the garment upload flow are unified under [`AppError`]. Each
//! variant describes how it should be presented through [`ErrorMetadata`], so the
//! transport layer never has to match on variants itself.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is on.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown file names
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PERSISTENCE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the caller may retry the same request
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden unless server errors are exposed
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Could not find owner: {0}")]
    OwnerNotFound(Uuid),

    #[error("Could not find garment: {0}")]
    GarmentNotFound(Uuid),

    #[error("File type not supported: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upload credential issuance failed: {0}")]
    CredentialIssuanceFailed(String),

    #[error("File record persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Garment state update failed: {0}")]
    StateUpdateFailed(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Response marshaling failed: {0}")]
    MarshalingFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::OwnerNotFound(_) => (404, "OWNER_NOT_FOUND", false, false, LogLevel::Debug),
        AppError::GarmentNotFound(_) => (404, "GARMENT_NOT_FOUND", false, false, LogLevel::Debug),
        AppError::UnsupportedFileType(_) => {
            (400, "UNSUPPORTED_FILE_TYPE", false, false, LogLevel::Debug)
        }
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::CredentialIssuanceFailed(_) => {
            (500, "CREDENTIAL_ISSUANCE_FAILED", true, true, LogLevel::Error)
        }
        AppError::PersistenceFailed(_) => (500, "PERSISTENCE_FAILED", true, true, LogLevel::Error),
        AppError::StateUpdateFailed(_) => (500, "STATE_UPDATE_FAILED", true, true, LogLevel::Error),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::MarshalingFailed(_) => (500, "MARSHALING_FAILED", false, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::OwnerNotFound(_) => "OwnerNotFound",
            AppError::GarmentNotFound(_) => "GarmentNotFound",
            AppError::UnsupportedFileType(_) => "UnsupportedFileType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::CredentialIssuanceFailed(_) => "CredentialIssuanceFailed",
            AppError::PersistenceFailed(_) => "PersistenceFailed",
            AppError::StateUpdateFailed(_) => "StateUpdateFailed",
            AppError::Database(_) => "Database",
            AppError::MarshalingFailed(_) => "MarshalingFailed",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::OwnerNotFound(id) => format!("Could not find owner: {}", id),
            AppError::GarmentNotFound(id) => format!("Could not find garment: {}", id),
            AppError::UnsupportedFileType(name) => format!("File type not supported: {}", name),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::CredentialIssuanceFailed(msg) => format!("Upload failed: {}", msg),
            AppError::PersistenceFailed(msg) => format!("File db saving failed: {}", msg),
            AppError::StateUpdateFailed(msg) => format!("Garment updating failed: {}", msg),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::MarshalingFailed(_) => {
                "the server has encountered an unexpected error".to_string()
            }
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
