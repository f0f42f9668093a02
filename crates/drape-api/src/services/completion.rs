//! Garment completion coordinator.
//!
//! Runs one upload request through classify → credential → record → flag →
//! readiness. Each step fails fast with its own error and nothing is rolled
//! back: a record without a flag is a tolerated inconsistency, a flag without a
//! record cannot happen because the record is always written first.
//!
//! Readiness has two outputs. `claimed` comes from the store's atomic claim and
//! is true for exactly one request per garment; only that one may trigger
//! downstream work. `ready` is the AND of the flags as re-read after the write,
//! and more than one concurrent request can observe it.
//!
//! The claim is guarded by the four flags inside the store, so it is attempted
//! after every flag write rather than only after a ready re-read. A process that
//! dies between the flag write and the claim leaves the garment ready but
//! unclaimed; the next upload for that garment takes the claim.

use chrono::Utc;
use drape_core::models::{canonical_name, FileRecord, UploadStage, FILEABLE_TYPE_GARMENT};
use drape_core::{AppError, Category, CategoryTable};
use drape_db::{FileRecordStore, GarmentStateStore, OwnerDirectory};
use drape_storage::{garment_original_key, CredentialIssuer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One inbound file registration
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub owner_id: Uuid,
    pub garment_id: Uuid,
    pub file_name: String,
    pub file_extension: String,
}

/// Result of a successful pipeline run
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: FileRecord,
    /// Every category present after this request's write
    pub ready: bool,
    /// This request won the readiness claim
    pub claimed: bool,
}

/// Collaborators the coordinator is built from
#[derive(Clone)]
pub struct CoordinatorDeps {
    pub owners: Arc<dyn OwnerDirectory>,
    pub garments: Arc<dyn GarmentStateStore>,
    pub files: Arc<dyn FileRecordStore>,
    pub issuer: Arc<dyn CredentialIssuer>,
}

#[derive(Clone)]
pub struct CompletionCoordinator {
    deps: CoordinatorDeps,
    categories: CategoryTable,
    credential_ttl: Duration,
}

impl CompletionCoordinator {
    pub fn new(deps: CoordinatorDeps, categories: CategoryTable, credential_ttl: Duration) -> Self {
        Self {
            deps,
            categories,
            credential_ttl,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            owner_id = %request.owner_id,
            garment_id = %request.garment_id,
            file_name = %request.file_name,
            operation = "handle_upload"
        )
    )]
    pub async fn handle_upload(&self, request: UploadRequest) -> Result<UploadOutcome, AppError> {
        let start = Instant::now();
        let garment_id = request.garment_id;

        self.deps
            .owners
            .find_owner(request.owner_id)
            .await?
            .ok_or(AppError::OwnerNotFound(request.owner_id))?;
        self.deps
            .garments
            .get(garment_id)
            .await?
            .ok_or(AppError::GarmentNotFound(garment_id))?;

        let category = self
            .categories
            .classify(&request.file_name)
            .category()
            .ok_or_else(|| AppError::UnsupportedFileType(request.file_name.clone()))?;
        tracing::debug!(category = %category, stage = %UploadStage::Pending, "File classified");

        let record = self.issue_and_record(&request, category).await?;
        let file_id = record.id;

        let update = self
            .deps
            .garments
            .set_category_present(garment_id, category, file_id)
            .await
            .map_err(|e| match e {
                AppError::GarmentNotFound(id) => AppError::GarmentNotFound(id),
                other => {
                    tracing::warn!(
                        file_id = %file_id,
                        category = %category,
                        stage = %UploadStage::Recorded,
                        "File recorded but category flag not set"
                    );
                    AppError::StateUpdateFailed(other.to_string())
                }
            })?;
        tracing::debug!(category = %category, file_id = %file_id, stage = %UploadStage::Flagged, "Category flagged");

        self.supersede(&record, update.previous_file_id).await;

        let claimed = self
            .deps
            .garments
            .claim_ready(garment_id)
            .await
            .map_err(|e| AppError::StateUpdateFailed(e.to_string()))?;

        let ready = claimed
            || self
                .deps
                .garments
                .get(garment_id)
                .await
                .map_err(|e| AppError::StateUpdateFailed(e.to_string()))?
                .ok_or(AppError::GarmentNotFound(garment_id))?
                .is_ready();

        tracing::info!(
            category = %category,
            file_id = %file_id,
            ready,
            claimed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Garment file registered"
        );

        Ok(UploadOutcome {
            record,
            ready,
            claimed,
        })
    }

    async fn issue_and_record(
        &self,
        request: &UploadRequest,
        category: Category,
    ) -> Result<FileRecord, AppError> {
        let issuer = &self.deps.issuer;
        let storage_key = garment_original_key(request.garment_id, &request.file_name)
            .map_err(|e| AppError::CredentialIssuanceFailed(e.to_string()))?;

        let credential = issuer
            .issue_write_credential(&storage_key, self.credential_ttl)
            .await
            .map_err(|e| AppError::CredentialIssuanceFailed(e.to_string()))?;
        tracing::debug!(storage_key = %storage_key, stage = %UploadStage::Uploading, "Write credential issued");

        let record = FileRecord {
            id: Uuid::new_v4(),
            garment_id: request.garment_id,
            category,
            file_name: request.file_name.clone(),
            file_extension: request.file_extension.clone(),
            canonical_name: canonical_name(&request.file_name).to_string(),
            storage_url: issuer.storage_url(&storage_key),
            bucket: issuer.bucket().to_string(),
            storage_key,
            disk: issuer.backend_type(),
            fileable_type: FILEABLE_TYPE_GARMENT.to_string(),
            presigned_upload_url: credential.url,
            presigned_expires_at: credential.expires_at,
            superseded_by: None,
            created_at: Utc::now(),
        };

        self.deps
            .files
            .create(&record)
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
        tracing::debug!(file_id = %record.id, stage = %UploadStage::Recorded, "File record persisted");

        Ok(record)
    }

    /// Point older records of the same category at `current`.
    ///
    /// Covers the slot's previous file and records left without a flag by an
    /// earlier request that failed after recording. Best effort: failures are
    /// logged and never fail the upload.
    async fn supersede(&self, current: &FileRecord, previous_file_id: Option<Uuid>) {
        let mut stale: Vec<Uuid> = previous_file_id
            .filter(|previous| *previous != current.id)
            .into_iter()
            .collect();

        match self.deps.files.list_for_garment(current.garment_id).await {
            Ok(records) => stale.extend(
                records
                    .iter()
                    .filter(|r| {
                        r.category == current.category
                            && r.id != current.id
                            && r.superseded_by.is_none()
                            && r.created_at <= current.created_at
                    })
                    .map(|r| r.id),
            ),
            Err(e) => {
                tracing::warn!(error = %e, garment_id = %current.garment_id, "Failed to list file records for supersession");
            }
        }
        stale.sort_unstable();
        stale.dedup();

        for previous in stale {
            match self.deps.files.mark_superseded(previous, current.id).await {
                Ok(true) => {
                    tracing::debug!(file_id = %previous, superseded_by = %current.id, "File record superseded");
                }
                Ok(false) => {
                    tracing::warn!(file_id = %previous, superseded_by = %current.id, "Previous file record missing or already superseded");
                }
                Err(e) => {
                    tracing::warn!(error = %e, file_id = %previous, superseded_by = %current.id, "Failed to mark file record superseded");
                }
            }
        }
    }
}
