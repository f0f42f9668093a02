//! Locally signed upload URLs.
//!
//! URL: `{base_url}/{key}?expires={unix_ts}&signature={token}` where the token is
//! base64url(HMAC-SHA256(secret, "PUT\n{key}\n{unix_ts}")). A file server in
//! front of the local disk checks the URL with [`LocalCredentialIssuer::verify`].

use crate::traits::{expiry_from_now, CredentialIssuer, StorageError, StorageResult, WriteCredential};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

/// Bucket name reported for files stored on the local backend
pub const LOCAL_BUCKET: &str = "local";

/// Local credential issuer signing URLs with a shared secret
#[derive(Clone)]
pub struct LocalCredentialIssuer {
    base_url: String,
    secret: Vec<u8>,
}

impl LocalCredentialIssuer {
    /// Create a new LocalCredentialIssuer instance
    ///
    /// # Arguments
    /// * `base_url` - Base URL the file server is reachable at (e.g., "http://localhost:4000/objects")
    /// * `secret` - Signing secret shared with the file server
    pub fn new(base_url: String, secret: impl Into<Vec<u8>>) -> StorageResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Local signing secret must not be empty".to_string(),
            ));
        }

        Ok(LocalCredentialIssuer {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret,
        })
    }

    fn sign(&self, object_key: &str, expiry_ts: i64) -> StorageResult<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(signing_payload(object_key, expiry_ts).as_bytes());
        let tag = mac.finalize().into_bytes();
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag))
    }

    /// Check a signature produced for `object_key`, rejecting it once `now` is past the expiry.
    pub fn verify(
        &self,
        object_key: &str,
        expiry_ts: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<()> {
        let tag = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| StorageError::SigningFailed("Malformed signature".to_string()))?;

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(signing_payload(object_key, expiry_ts).as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| StorageError::SigningFailed("Signature mismatch".to_string()))?;

        if now.timestamp() > expiry_ts {
            return Err(StorageError::SigningFailed(
                "Upload URL has expired".to_string(),
            ));
        }
        Ok(())
    }
}

fn signing_payload(object_key: &str, expiry_ts: i64) -> String {
    format!("PUT\n{}\n{}", object_key, expiry_ts)
}

#[async_trait]
impl CredentialIssuer for LocalCredentialIssuer {
    async fn issue_write_credential(
        &self,
        object_key: &str,
        ttl: Duration,
    ) -> StorageResult<WriteCredential> {
        if object_key.contains("..") || object_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let expires_at = expiry_from_now(ttl)?;
        let expiry_ts = expires_at.timestamp();
        let signature = self.sign(object_key, expiry_ts)?;

        let url = format!(
            "{}/{}?expires={}&signature={}",
            self.base_url, object_key, expiry_ts, signature
        );

        tracing::debug!(key = %object_key, ttl_secs = ttl.as_secs(), "Issued local upload URL");

        Ok(WriteCredential { url, expires_at })
    }

    fn bucket(&self) -> &str {
        LOCAL_BUCKET
    }

    fn storage_url(&self, object_key: &str) -> String {
        format!("{}/{}", self.base_url, object_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
