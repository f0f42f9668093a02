//! Credential issuer abstraction
//!
//! This module defines the trait every storage backend implements to hand out
//! write-scoped upload URLs.

use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Short-lived authorization for one PUT of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCredential {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues write credentials against a single bucket.
///
/// The bucket is bound when the issuer is built, the same way an object store
/// client is scoped to one bucket. Issuing a credential has no side effect
/// beyond the signing call itself.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Produce a credential valid for `ttl` that authorizes a single PUT of `object_key`.
    async fn issue_write_credential(
        &self,
        object_key: &str,
        ttl: Duration,
    ) -> StorageResult<WriteCredential>;

    /// Bucket (or location descriptor) the issuer signs for
    fn bucket(&self) -> &str;

    /// Location of the object once uploaded
    fn storage_url(&self, object_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Absolute expiry of a credential issued now with the given TTL.
pub(crate) fn expiry_from_now(ttl: Duration) -> StorageResult<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| StorageError::ConfigError(format!("Invalid credential TTL: {}", e)))?;
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| StorageError::ConfigError("Credential TTL out of range".to_string()))
}
