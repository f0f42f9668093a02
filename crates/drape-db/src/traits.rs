//! Repository trait abstractions
//!
//! These traits define the minimal interface the completion flow needs from
//! persistence, so the PostgreSQL repositories and the in-memory stores are
//! interchangeable.

use async_trait::async_trait;
use drape_core::models::{FileRecord, Garment, Owner};
use drape_core::{AppError, Category};
use uuid::Uuid;

/// Result of marking one category present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUpdate {
    /// File the category pointed at before this write, if any
    pub previous_file_id: Option<Uuid>,
}

/// Owner existence lookup
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError>;

    /// Register an owner unless one with the same id exists.
    ///
    /// Returns true when the owner was created.
    async fn register_owner(&self, owner: &Owner) -> Result<bool, AppError>;
}

/// Per-garment completion state.
///
/// Writes touch a single category's fields of a single garment; nothing here
/// rewrites a whole garment.
#[async_trait]
pub trait GarmentStateStore: Send + Sync {
    /// Get a garment by ID
    async fn get(&self, garment_id: Uuid) -> Result<Option<Garment>, AppError>;

    /// Register a garment unless one with the same id exists.
    ///
    /// Returns true when the garment was created.
    async fn register_garment(&self, garment: &Garment) -> Result<bool, AppError>;

    /// Set `category` present and point it at `file_id`.
    ///
    /// Returns `GarmentNotFound` when the garment does not exist.
    async fn set_category_present(
        &self,
        garment_id: Uuid,
        category: Category,
        file_id: Uuid,
    ) -> Result<SlotUpdate, AppError>;

    /// Flip `triggered` from false to true if every category is present.
    ///
    /// Returns true for exactly one caller per garment.
    async fn claim_ready(&self, garment_id: Uuid) -> Result<bool, AppError>;
}

/// Append-only file metadata store
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Insert a new record
    async fn create(&self, record: &FileRecord) -> Result<(), AppError>;

    /// Get a record by ID
    async fn get(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Write the `superseded_by` back-reference if it is still empty.
    ///
    /// Returns false when the record is missing or was already superseded.
    async fn mark_superseded(&self, file_id: Uuid, superseded_by: Uuid) -> Result<bool, AppError>;

    /// All records of a garment, oldest first
    async fn list_for_garment(&self, garment_id: Uuid) -> Result<Vec<FileRecord>, AppError>;
}
