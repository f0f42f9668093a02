#[cfg(feature = "storage-local")]
use crate::LocalCredentialIssuer;
#[cfg(feature = "storage-s3")]
use crate::S3CredentialIssuer;
use crate::{CredentialIssuer, StorageBackend, StorageError, StorageResult};
use drape_core::Config;
use std::sync::Arc;

/// Create a credential issuer based on configuration
pub async fn create_credential_issuer(config: &Config) -> StorageResult<Arc<dyn CredentialIssuer>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let issuer = S3CredentialIssuer::new(bucket, region, endpoint).await?;
            Ok(Arc::new(issuer))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;
            let secret = config
                .local_signing_secret()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_SIGNING_SECRET not configured".to_string())
                })?;

            let issuer = LocalCredentialIssuer::new(base_url, secret)?;
            Ok(Arc::new(issuer))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
