//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod provision;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use drape_core::{Config, LoggingReadyNotifier};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        state_backend = ?config.state_backend(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    // Setup state stores
    let stores = database::setup_stores(&config).await?;
    provision::provision(&config, &stores).await?;

    // Setup storage
    let issuer = storage::setup_credential_issuer(&config).await?;

    let deps = stores.into_deps(issuer);
    let state = Arc::new(AppState::new(
        config.clone(),
        deps,
        Arc::new(LoggingReadyNotifier),
    ));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
