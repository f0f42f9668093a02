use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::category::Category;
use crate::models::FileRecord;

/// Stage of one (garment, category) upload inside the completion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    /// Classified, no credential yet
    Pending,
    /// Write credential issued
    Uploading,
    /// File record persisted
    Recorded,
    /// Category flag set on the garment
    Flagged,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Pending => "pending",
            UploadStage::Uploading => "uploading",
            UploadStage::Recorded => "recorded",
            UploadStage::Flagged => "flagged",
        }
    }
}

impl std::fmt::Display for UploadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to register one garment file and obtain a write URL for it
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UploadFileRequest {
    /// Exact file name; decides the category
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// File extension as reported by the client
    #[serde(default)]
    #[validate(length(max = 32, message = "File extension must be at most 32 characters"))]
    pub file_extension: String,
}

/// Registered file plus the credential to upload it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponse {
    pub file_id: Uuid,
    pub file_name: String,
    pub file_extension: String,
    /// Location of the object once uploaded
    pub storage_url: String,
    pub bucket: String,
    pub category: Category,
    /// File name without extension
    pub canonical_name: String,
    pub storage_key: String,
    /// Time-limited URL accepting a single PUT of the file
    pub presigned_upload_url: String,
    pub expires_at: DateTime<Utc>,
    /// Whether every category of the garment is now present
    pub ready: bool,
}

impl UploadFileResponse {
    pub fn from_record(record: &FileRecord, ready: bool) -> Self {
        Self {
            file_id: record.id,
            file_name: record.file_name.clone(),
            file_extension: record.file_extension.clone(),
            storage_url: record.storage_url.clone(),
            bucket: record.bucket.clone(),
            category: record.category,
            canonical_name: record.canonical_name.clone(),
            storage_key: record.storage_key.clone(),
            presigned_upload_url: record.presigned_upload_url.clone(),
            expires_at: record.presigned_expires_at,
            ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let ok = UploadFileRequest {
            file_name: "start_meshes.obj".to_string(),
            file_extension: "obj".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = UploadFileRequest {
            file_name: String::new(),
            file_extension: "obj".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_missing_extension_defaults_to_empty() {
        let request: UploadFileRequest =
            serde_json::from_str(r#"{"file_name":"render_meshes.fbx"}"#).unwrap();
        assert_eq!(request.file_extension, "");
    }
}
