use async_trait::async_trait;
use drape_core::models::{CategorySlot, CategorySlots, Garment};
use drape_core::{AppError, Category};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::traits::{GarmentStateStore, SlotUpdate};

const GARMENT_COLUMNS: &str = "id, owner_id, name, \
    material_flag, material_file_id, model_flag, model_file_id, \
    metadata_flag, metadata_file_id, render_flag, render_file_id, \
    triggered, created_at, updated_at";

/// Repository for garment completion state
#[derive(Clone)]
pub struct GarmentRepository {
    pool: PgPool,
}

impl GarmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn garment_from_row(row: &PgRow) -> Result<Garment, sqlx::Error> {
    let mut slots = CategorySlots::new();
    for category in Category::ALL {
        let slot = CategorySlot {
            present: row.try_get(category.flag_name())?,
            file_id: row.try_get(category.file_id_name())?,
        };
        slots.set_slot(category, slot);
    }

    Ok(Garment {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        slots,
        triggered: row.try_get("triggered")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl GarmentStateStore for GarmentRepository {
    #[tracing::instrument(skip(self), fields(db.table = "garments", db.operation = "select", db.record_id = %garment_id))]
    async fn get(&self, garment_id: Uuid) -> Result<Option<Garment>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM garments WHERE id = $1",
            GARMENT_COLUMNS
        ))
        .bind(garment_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(garment_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, garment), fields(db.table = "garments", db.operation = "insert", db.record_id = %garment.id))]
    async fn register_garment(&self, garment: &Garment) -> Result<bool, AppError> {
        let inserted = sqlx::query_scalar::<Postgres, Uuid>(
            "INSERT INTO garments (id, owner_id, name) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING RETURNING id",
        )
        .bind(garment.id)
        .bind(garment.owner_id)
        .bind(&garment.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    #[tracing::instrument(skip(self), fields(db.table = "garments", db.operation = "update", db.record_id = %garment_id, category = %category))]
    async fn set_category_present(
        &self,
        garment_id: Uuid,
        category: Category,
        file_id: Uuid,
    ) -> Result<SlotUpdate, AppError> {
        let flag = category.flag_name();
        let file_column = category.file_id_name();

        let mut tx = self.pool.begin().await?;

        // Row lock on the garment; only this category's columns are read and written.
        let previous = sqlx::query_scalar::<Postgres, Option<Uuid>>(&format!(
            "SELECT {} FROM garments WHERE id = $1 FOR UPDATE",
            file_column
        ))
        .bind(garment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(previous_file_id) = previous else {
            tx.rollback().await?;
            return Err(AppError::GarmentNotFound(garment_id));
        };

        sqlx::query(&format!(
            "UPDATE garments SET {} = TRUE, {} = $2, updated_at = NOW() WHERE id = $1",
            flag, file_column
        ))
        .bind(garment_id)
        .bind(file_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SlotUpdate { previous_file_id })
    }

    #[tracing::instrument(skip(self), fields(db.table = "garments", db.operation = "update", db.record_id = %garment_id))]
    async fn claim_ready(&self, garment_id: Uuid) -> Result<bool, AppError> {
        let claimed = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            UPDATE garments
            SET triggered = TRUE, updated_at = NOW()
            WHERE id = $1
              AND triggered = FALSE
              AND material_flag AND model_flag AND metadata_flag AND render_flag
            RETURNING id
            "#,
        )
        .bind(garment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claimed.is_some())
    }
}
