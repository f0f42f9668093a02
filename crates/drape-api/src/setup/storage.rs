//! Storage setup and initialization

use anyhow::Result;
use drape_core::Config;
use drape_storage::{create_credential_issuer, CredentialIssuer};
use std::sync::Arc;

/// Setup the credential issuer for the configured storage backend
pub async fn setup_credential_issuer(config: &Config) -> Result<Arc<dyn CredentialIssuer>> {
    tracing::info!("Initializing credential issuer...");
    let issuer = create_credential_issuer(config).await?;
    tracing::info!(
        backend = %issuer.backend_type(),
        bucket = %issuer.bucket(),
        ttl_secs = config.upload_url_ttl_seconds(),
        "Credential issuer initialized successfully"
    );
    Ok(issuer)
}
