//! Startup provisioning of owners and garments
//!
//! Owners and garments are registered from the JSON file named by `SEED_FILE`:
//!
//! ```json
//! {
//!   "owners": [
//!     {
//!       "id": "6f2c1c9e-3d5b-4d0a-9a59-2f6d8c3b7e11",
//!       "name": "atelier",
//!       "garments": [{ "id": "0b8e4a8f-1f0e-4c55-8d8a-6f3f1c2d9a40", "name": "linen shirt" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Registration is idempotent, so the same file can be applied on every start
//! against PostgreSQL without touching existing completion state.

use super::database::Stores;
use anyhow::{Context, Result};
use drape_core::models::{Garment, Owner};
use drape_core::{AppError, Config, StateBackend};
use drape_db::{GarmentStateStore, OwnerDirectory};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub owners: Vec<SeedOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedOwner {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub garments: Vec<SeedGarment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedGarment {
    pub id: Uuid,
    pub name: String,
}

/// Counts of newly created entities; existing ones are skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub owners_created: usize,
    pub garments_created: usize,
}

impl Seed {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid seed file")
    }

    pub async fn load(path: &str) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read seed file {}", path))?;
        Self::from_json(&raw)
    }
}

/// Register every owner of `seed`, then its garments
pub async fn apply_seed(stores: &Stores, seed: &Seed) -> Result<ProvisionSummary, AppError> {
    let mut summary = ProvisionSummary::default();

    for seed_owner in &seed.owners {
        let owner = Owner {
            id: seed_owner.id,
            name: seed_owner.name.clone(),
        };
        if stores.owners.register_owner(&owner).await? {
            summary.owners_created += 1;
        }

        for seed_garment in &seed_owner.garments {
            let garment = Garment::new(seed_garment.id, owner.id, seed_garment.name.clone());
            if stores.garments.register_garment(&garment).await? {
                summary.garments_created += 1;
            } else {
                tracing::debug!(garment_id = %garment.id, "Garment already registered");
            }
        }
    }

    Ok(summary)
}

/// Apply `SEED_FILE` if configured
pub async fn provision(config: &Config, stores: &Stores) -> Result<()> {
    let Some(path) = config.seed_file() else {
        if config.state_backend() == StateBackend::Memory {
            tracing::warn!(
                "No SEED_FILE configured - the in-memory backend starts without owners or garments"
            );
        }
        return Ok(());
    };

    let seed = Seed::load(path).await?;
    let summary = apply_seed(stores, &seed)
        .await
        .context("Failed to apply seed file")?;

    tracing::info!(
        seed_file = %path,
        owners_created = summary.owners_created,
        garments_created = summary.garments_created,
        "Seed file applied"
    );
    Ok(())
}
