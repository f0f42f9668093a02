//! State store setup and initialization

use crate::services::CoordinatorDeps;
use anyhow::{Context, Result};
use drape_core::{Config, StateBackend};
use drape_db::{
    run_migrations, FileRecordRepository, FileRecordStore, GarmentRepository, GarmentStateStore,
    InMemoryFileRecordStore, InMemoryGarmentStateStore, InMemoryOwnerDirectory, OwnerDirectory,
    OwnerRepository,
};
use drape_storage::CredentialIssuer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Persistence collaborators of the coordinator
pub struct Stores {
    pub owners: Arc<dyn OwnerDirectory>,
    pub garments: Arc<dyn GarmentStateStore>,
    pub files: Arc<dyn FileRecordStore>,
}

impl Stores {
    pub fn into_deps(self, issuer: Arc<dyn CredentialIssuer>) -> CoordinatorDeps {
        CoordinatorDeps {
            owners: self.owners,
            garments: self.garments,
            files: self.files,
            issuer,
        }
    }
}

/// Build the stores selected by `STATE_BACKEND`
pub async fn setup_stores(config: &Config) -> Result<Stores> {
    match config.state_backend() {
        StateBackend::Postgres => {
            let pool = setup_database(config).await?;
            Ok(Stores {
                owners: Arc::new(OwnerRepository::new(pool.clone())),
                garments: Arc::new(GarmentRepository::new(pool.clone())),
                files: Arc::new(FileRecordRepository::new(pool)),
            })
        }
        StateBackend::Memory => {
            tracing::warn!("Using in-memory state backend - data is lost on restart");
            Ok(Stores {
                owners: Arc::new(InMemoryOwnerDirectory::new()),
                garments: Arc::new(InMemoryGarmentStateStore::new()),
                files: Arc::new(InMemoryFileRecordStore::new()),
            })
        }
    }
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url()
        .context("DATABASE_URL must be set when using the postgres state backend")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
