use async_trait::async_trait;
use drape_core::models::FileRecord;
use drape_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::traits::FileRecordStore;

const FILE_COLUMNS: &str = "id, garment_id, category, file_name, file_extension, \
    canonical_name, storage_url, bucket, storage_key, disk, fileable_type, \
    presigned_upload_url, presigned_expires_at, superseded_by, created_at";

/// Repository for garment file records
#[derive(Clone)]
pub struct FileRecordRepository {
    pool: PgPool,
}

impl FileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn file_record_from_row(row: &PgRow) -> Result<FileRecord, sqlx::Error> {
    let category: String = row.try_get("category")?;
    let disk: String = row.try_get("disk")?;

    Ok(FileRecord {
        id: row.try_get("id")?,
        garment_id: row.try_get("garment_id")?,
        category: category
            .parse()
            .map_err(|e: anyhow::Error| sqlx::Error::Decode(e.into()))?,
        file_name: row.try_get("file_name")?,
        file_extension: row.try_get("file_extension")?,
        canonical_name: row.try_get("canonical_name")?,
        storage_url: row.try_get("storage_url")?,
        bucket: row.try_get("bucket")?,
        storage_key: row.try_get("storage_key")?,
        disk: disk
            .parse()
            .map_err(|e: anyhow::Error| sqlx::Error::Decode(e.into()))?,
        fileable_type: row.try_get("fileable_type")?,
        presigned_upload_url: row.try_get("presigned_upload_url")?,
        presigned_expires_at: row.try_get("presigned_expires_at")?,
        superseded_by: row.try_get("superseded_by")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl FileRecordStore for FileRecordRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "garment_files", db.operation = "insert", db.record_id = %record.id))]
    async fn create(&self, record: &FileRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO garment_files (
                id, garment_id, category, file_name, file_extension,
                canonical_name, storage_url, bucket, storage_key, disk, fileable_type,
                presigned_upload_url, presigned_expires_at, superseded_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id)
        .bind(record.garment_id)
        .bind(record.category.as_str())
        .bind(&record.file_name)
        .bind(&record.file_extension)
        .bind(&record.canonical_name)
        .bind(&record.storage_url)
        .bind(&record.bucket)
        .bind(&record.storage_key)
        .bind(record.disk.as_str())
        .bind(&record.fileable_type)
        .bind(&record.presigned_upload_url)
        .bind(record.presigned_expires_at)
        .bind(record.superseded_by)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "garment_files", db.operation = "select", db.record_id = %file_id))]
    async fn get(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM garment_files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(file_record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "garment_files", db.operation = "update", db.record_id = %file_id))]
    async fn mark_superseded(&self, file_id: Uuid, superseded_by: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE garment_files SET superseded_by = $2 WHERE id = $1 AND superseded_by IS NULL",
        )
        .bind(file_id)
        .bind(superseded_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self), fields(db.table = "garment_files", db.operation = "select"))]
    async fn list_for_garment(&self, garment_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM garment_files WHERE garment_id = $1 ORDER BY created_at ASC",
            FILE_COLUMNS
        ))
        .bind(garment_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| file_record_from_row(row).map_err(AppError::from))
            .collect()
    }
}
