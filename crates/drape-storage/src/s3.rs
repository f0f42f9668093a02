use crate::traits::{expiry_from_now, CredentialIssuer, StorageError, StorageResult, WriteCredential};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use std::time::Duration;

/// S3 credential issuer backed by `object_store`'s request signer
#[derive(Clone)]
pub struct S3CredentialIssuer {
    store: AmazonS3,
    bucket: String,
}

impl S3CredentialIssuer {
    /// Create a new S3CredentialIssuer instance
    ///
    /// Credentials are taken from the standard AWS environment variables.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        Self::from_builder(AmazonS3Builder::from_env(), bucket, region, endpoint_url)
    }

    pub(crate) fn from_builder(
        builder: AmazonS3Builder,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = builder
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::debug!(
            bucket = %bucket,
            region = %region,
            endpoint = endpoint_url.as_deref().unwrap_or("aws"),
            "S3 credential issuer configured"
        );

        Ok(S3CredentialIssuer { store, bucket })
    }
}

#[async_trait]
impl CredentialIssuer for S3CredentialIssuer {
    async fn issue_write_credential(
        &self,
        object_key: &str,
        ttl: Duration,
    ) -> StorageResult<WriteCredential> {
        let start = std::time::Instant::now();
        let location = Path::from(object_key.to_string());
        let expires_at = expiry_from_now(ttl)?;

        let url = self
            .store
            .signed_url(Method::PUT, &location, ttl)
            .await
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?
            .to_string();

        tracing::debug!(
            bucket = %self.bucket,
            key = %object_key,
            ttl_secs = ttl.as_secs(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Issued presigned PUT URL"
        );

        Ok(WriteCredential { url, expires_at })
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn storage_url(&self, object_key: &str) -> String {
        format!("s3://{}/{}", self.bucket, object_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> S3CredentialIssuer {
        let builder = AmazonS3Builder::new()
            .with_access_key_id("AKIDEXAMPLE")
            .with_secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        S3CredentialIssuer::from_builder(
            builder,
            "drape-images".to_string(),
            "eu-west-1".to_string(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_presigned_put_url_scoped_to_key_and_ttl() {
        let issuer = issuer();
        let key = "asset/4f1c8a52-61a7-4b8e-9d55-0c7f3f6f2a10/original/start_meshes.obj";
        let credential = issuer
            .issue_write_credential(key, Duration::from_secs(600))
            .await
            .unwrap();

        assert!(credential.url.contains(key), "{}", credential.url);
        assert!(credential.url.contains("X-Amz-Expires=600"));
        assert!(credential.url.contains("X-Amz-Signature="));
        assert!(credential.expires_at > chrono::Utc::now());
    }

    #[test]
    fn test_storage_url_uses_s3_scheme() {
        let issuer = issuer();
        assert_eq!(
            issuer.storage_url("asset/x/original/render_meshes.fbx"),
            "s3://drape-images/asset/x/original/render_meshes.fbx"
        );
        assert_eq!(issuer.bucket(), "drape-images");
        assert_eq!(issuer.backend_type(), StorageBackend::S3);
    }
}
