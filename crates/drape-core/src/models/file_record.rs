use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::storage_types::StorageBackend;

/// Owner type recorded on every file; files only ever attach to garments.
pub const FILEABLE_TYPE_GARMENT: &str = "garment";

/// Metadata for one accepted upload.
///
/// Content fields never change after creation. `superseded_by` is the only
/// writable field and is written at most once, when a newer upload replaces
/// this one for the same category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub garment_id: Uuid,
    pub category: Category,
    pub file_name: String,
    pub file_extension: String,
    pub canonical_name: String,
    pub storage_url: String,
    pub bucket: String,
    pub storage_key: String,
    pub disk: StorageBackend,
    pub fileable_type: String,
    pub presigned_upload_url: String,
    pub presigned_expires_at: DateTime<Utc>,
    pub superseded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// File name with its last extension removed (`a.b.obj` → `a.b`).
pub fn canonical_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}
