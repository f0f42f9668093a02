use async_trait::async_trait;
use drape_core::models::Owner;
use drape_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::traits::OwnerDirectory;

/// Repository for owners
#[derive(Clone)]
pub struct OwnerRepository {
    pool: PgPool,
}

impl OwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerDirectory for OwnerRepository {
    #[tracing::instrument(skip(self), fields(db.table = "owners", db.operation = "select", db.record_id = %owner_id))]
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError> {
        let row = sqlx::query_as::<Postgres, (Uuid, String)>(
            "SELECT id, name FROM owners WHERE id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| Owner { id, name }))
    }

    #[tracing::instrument(skip(self, owner), fields(db.table = "owners", db.operation = "insert", db.record_id = %owner.id))]
    async fn register_owner(&self, owner: &Owner) -> Result<bool, AppError> {
        let inserted = sqlx::query_scalar::<Postgres, Uuid>(
            "INSERT INTO owners (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING RETURNING id",
        )
        .bind(owner.id)
        .bind(&owner.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }
}
