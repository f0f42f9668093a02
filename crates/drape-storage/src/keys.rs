//! Shared key generation for storage backends.
//!
//! Key format: `asset/{garment_id}/original/{file_name}`.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

/// Generate the storage key of a garment's original file.
///
/// The same (garment, file name) pair always yields the same key. File names
/// that could escape the garment prefix are rejected.
pub fn garment_original_key(garment_id: Uuid, file_name: &str) -> StorageResult<String> {
    validate_file_name(file_name)?;
    Ok(format!("asset/{}/original/{}", garment_id, file_name))
}

fn validate_file_name(file_name: &str) -> StorageResult<()> {
    if file_name.is_empty() {
        return Err(StorageError::InvalidKey("File name is empty".to_string()));
    }
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "File name contains invalid characters: {}",
            file_name
        )));
    }
    Ok(())
}
