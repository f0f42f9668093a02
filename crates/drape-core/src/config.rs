//! Configuration module
//!
//! Configuration is read once at process start and handed to every component
//! that needs it. Nothing reads the environment lazily afterwards.

use std::env;

use crate::category::{Category, CategoryTable};
use crate::storage_types::{StateBackend, StorageBackend};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_URL_TTL_SECS: u64 = 600;
const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Base configuration shared by all services
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Garment upload service configuration
#[derive(Clone, Debug)]
pub struct GarmentServiceConfig {
    pub base: BaseConfig,
    pub state_backend: StateBackend,
    pub database_url: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_signing_secret: Option<String>,
    pub upload_url_ttl_seconds: u64,
    // Error presentation
    pub expose_server_errors: bool,
    // File name → category mapping
    pub categories: CategoryTable,
    // Owners and garments registered at startup
    pub seed_file: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GarmentServiceConfig>);

impl Config {
    fn inner(&self) -> &GarmentServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GarmentServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn state_backend(&self) -> StateBackend {
        self.inner().state_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn local_signing_secret(&self) -> Option<&str> {
        self.inner().local_signing_secret.as_deref()
    }

    pub fn upload_url_ttl_seconds(&self) -> u64 {
        self.inner().upload_url_ttl_seconds
    }

    pub fn expose_server_errors(&self) -> bool {
        self.inner().expose_server_errors
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.inner().categories
    }

    pub fn seed_file(&self) -> Option<&str> {
        self.inner().seed_file.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn category_env_key(category: Category) -> &'static str {
    match category {
        Category::Material => "CATEGORY_MATERIAL_FILE",
        Category::Model => "CATEGORY_MODEL_FILE",
        Category::Metadata => "CATEGORY_METADATA_FILE",
        Category::Render => "CATEGORY_RENDER_FILE",
    }
}

impl GarmentServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_env(&environment);

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let state_backend = match lookup("STATE_BACKEND") {
            Some(value) => value.parse()?,
            None => StateBackend::Postgres,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let categories =
            CategoryTable::with_overrides(|category| {
                lookup(category_env_key(category)).filter(|s| !s.trim().is_empty())
            })?;

        let config = GarmentServiceConfig {
            base,
            state_backend,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            storage_backend,
            s3_bucket: lookup("S3_BUCKET").filter(|s| !s.is_empty()),
            s3_region: lookup("S3_REGION").filter(|s| !s.is_empty()),
            s3_endpoint: lookup("S3_ENDPOINT").filter(|s| !s.is_empty()),
            aws_region: lookup("AWS_REGION").filter(|s| !s.is_empty()),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL").filter(|s| !s.is_empty()),
            local_signing_secret: lookup("LOCAL_SIGNING_SECRET").filter(|s| !s.is_empty()),
            upload_url_ttl_seconds: lookup("UPLOAD_URL_TTL_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOAD_URL_TTL_SECS),
            expose_server_errors: lookup("EXPOSE_SERVER_ERRORS")
                .and_then(|s| s.to_lowercase().parse().ok())
                .unwrap_or(!is_production),
            categories,
            seed_file: lookup("SEED_FILE").filter(|s| !s.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_url_ttl_seconds == 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_TTL_SECONDS must be greater than zero"
            ));
        }

        if self.state_backend == StateBackend::Postgres {
            match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using the postgres state backend"
                    ))
                }
                Some(url)
                    if !url.starts_with("postgres://") && !url.starts_with("postgresql://") =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                Some(_) => {}
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
                match self.local_signing_secret.as_deref() {
                    Some(secret) if secret.len() >= MIN_SIGNING_SECRET_LEN => {}
                    _ => {
                        return Err(anyhow::anyhow!(
                            "LOCAL_SIGNING_SECRET must be at least {} characters long",
                            MIN_SIGNING_SECRET_LEN
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}
