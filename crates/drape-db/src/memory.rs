//! In-memory repositories
//!
//! Same contracts as the PostgreSQL repositories, held in process memory. Used
//! for `STATE_BACKEND=memory` and in tests. Each store can be switched into a
//! failing mode to simulate an unavailable dependency.

use async_trait::async_trait;
use chrono::Utc;
use drape_core::models::{FileRecord, Garment, Owner};
use drape_core::{AppError, Category};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::traits::{FileRecordStore, GarmentStateStore, OwnerDirectory, SlotUpdate};

/// In-memory owner directory
#[derive(Clone, Default)]
pub struct InMemoryOwnerDirectory {
    owners: Arc<Mutex<HashMap<Uuid, Owner>>>,
}

impl InMemoryOwnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerDirectory for InMemoryOwnerDirectory {
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError> {
        Ok(self.owners.lock().await.get(&owner_id).cloned())
    }

    async fn register_owner(&self, owner: &Owner) -> Result<bool, AppError> {
        let mut owners = self.owners.lock().await;
        if owners.contains_key(&owner.id) {
            return Ok(false);
        }
        owners.insert(owner.id, owner.clone());
        Ok(true)
    }
}

/// In-memory garment state store
#[derive(Clone, Default)]
pub struct InMemoryGarmentStateStore {
    garments: Arc<Mutex<HashMap<Uuid, Garment>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryGarmentStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set_category_present` fail until switched back
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl GarmentStateStore for InMemoryGarmentStateStore {
    async fn get(&self, garment_id: Uuid) -> Result<Option<Garment>, AppError> {
        Ok(self.garments.lock().await.get(&garment_id).cloned())
    }

    async fn register_garment(&self, garment: &Garment) -> Result<bool, AppError> {
        let mut garments = self.garments.lock().await;
        if garments.contains_key(&garment.id) {
            return Ok(false);
        }
        garments.insert(garment.id, garment.clone());
        Ok(true)
    }

    async fn set_category_present(
        &self,
        garment_id: Uuid,
        category: Category,
        file_id: Uuid,
    ) -> Result<SlotUpdate, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "garment state store unavailable".to_string(),
            ));
        }

        let mut garments = self.garments.lock().await;
        let garment = garments
            .get_mut(&garment_id)
            .ok_or(AppError::GarmentNotFound(garment_id))?;

        let previous_file_id = garment.slots.set_present(category, file_id);
        garment.updated_at = Utc::now();

        Ok(SlotUpdate { previous_file_id })
    }

    async fn claim_ready(&self, garment_id: Uuid) -> Result<bool, AppError> {
        let mut garments = self.garments.lock().await;
        let Some(garment) = garments.get_mut(&garment_id) else {
            return Ok(false);
        };

        if garment.triggered || !garment.is_ready() {
            return Ok(false);
        }

        garment.triggered = true;
        garment.updated_at = Utc::now();
        Ok(true)
    }
}

/// In-memory file record store
#[derive(Clone, Default)]
pub struct InMemoryFileRecordStore {
    records: Arc<Mutex<Vec<FileRecord>>>,
    fail_creates: Arc<AtomicBool>,
}

impl InMemoryFileRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create` fail until switched back
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl FileRecordStore for InMemoryFileRecordStore {
    async fn create(&self, record: &FileRecord) -> Result<(), AppError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("file record store unavailable".to_string()));
        }

        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::Internal(format!(
                "duplicate file record id: {}",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn get(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.id == file_id)
            .cloned())
    }

    async fn mark_superseded(&self, file_id: Uuid, superseded_by: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|r| r.id == file_id) {
            Some(record) if record.superseded_by.is_none() => {
                record.superseded_by = Some(superseded_by);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_for_garment(&self, garment_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.garment_id == garment_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_core::models::{canonical_name, FILEABLE_TYPE_GARMENT};
    use drape_core::StorageBackend;

    fn record(garment_id: Uuid, category: Category, file_name: &str) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            garment_id,
            category,
            file_name: file_name.to_string(),
            file_extension: file_name.rsplit('.').next().unwrap_or("").to_string(),
            canonical_name: canonical_name(file_name).to_string(),
            storage_url: format!("s3://drape-images/asset/{}/original/{}", garment_id, file_name),
            bucket: "drape-images".to_string(),
            storage_key: format!("asset/{}/original/{}", garment_id, file_name),
            disk: StorageBackend::S3,
            fileable_type: FILEABLE_TYPE_GARMENT.to_string(),
            presigned_upload_url: "https://example.invalid/upload".to_string(),
            presigned_expires_at: Utc::now(),
            superseded_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_set_category_present_touches_only_named_slot() {
        let store = InMemoryGarmentStateStore::new();
        let garment = Garment::new(Uuid::new_v4(), Uuid::new_v4(), "jacket");
        let garment_id = garment.id;
        assert!(store.register_garment(&garment).await.unwrap());

        let file_id = Uuid::new_v4();
        let update = store
            .set_category_present(garment_id, Category::Model, file_id)
            .await
            .unwrap();
        assert_eq!(update.previous_file_id, None);

        let garment = store.get(garment_id).await.unwrap().unwrap();
        assert_eq!(garment.slots.get(Category::Model).file_id, Some(file_id));
        assert!(!garment.slots.get(Category::Material).present);
        assert!(!garment.is_ready());
    }

    #[tokio::test]
    async fn test_register_is_idempotent_and_keeps_state() {
        let owners = InMemoryOwnerDirectory::new();
        let owner = Owner {
            id: Uuid::new_v4(),
            name: "atelier".to_string(),
        };
        assert!(owners.register_owner(&owner).await.unwrap());
        assert!(!owners.register_owner(&owner).await.unwrap());
        assert_eq!(owners.find_owner(owner.id).await.unwrap(), Some(owner.clone()));

        let store = InMemoryGarmentStateStore::new();
        let garment = Garment::new(Uuid::new_v4(), owner.id, "jacket");
        assert!(store.register_garment(&garment).await.unwrap());
        let file_id = Uuid::new_v4();
        store
            .set_category_present(garment.id, Category::Render, file_id)
            .await
            .unwrap();

        // Registering again must not reset the flags.
        assert!(!store.register_garment(&garment).await.unwrap());
        let stored = store.get(garment.id).await.unwrap().unwrap();
        assert_eq!(stored.slots.get(Category::Render).file_id, Some(file_id));
    }

    #[tokio::test]
    async fn test_set_category_present_unknown_garment() {
        let store = InMemoryGarmentStateStore::new();
        let result = store
            .set_category_present(Uuid::new_v4(), Category::Render, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::GarmentNotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_ready_requires_all_flags_and_succeeds_once() {
        let store = InMemoryGarmentStateStore::new();
        let garment = Garment::new(Uuid::new_v4(), Uuid::new_v4(), "jacket");
        let garment_id = garment.id;
        store.register_garment(&garment).await.unwrap();

        for category in [Category::Material, Category::Model, Category::Metadata] {
            store
                .set_category_present(garment_id, category, Uuid::new_v4())
                .await
                .unwrap();
            assert!(!store.claim_ready(garment_id).await.unwrap());
        }

        store
            .set_category_present(garment_id, Category::Render, Uuid::new_v4())
            .await
            .unwrap();
        assert!(store.claim_ready(garment_id).await.unwrap());
        assert!(!store.claim_ready(garment_id).await.unwrap());
        assert!(store.get(garment_id).await.unwrap().unwrap().triggered);
    }

    #[tokio::test]
    async fn test_mark_superseded_is_write_once() {
        let store = InMemoryFileRecordStore::new();
        let garment_id = Uuid::new_v4();
        let first = record(garment_id, Category::Model, "start_meshes.obj");
        let second = record(garment_id, Category::Model, "start_meshes.obj");
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();

        assert!(store.mark_superseded(first.id, second.id).await.unwrap());
        assert!(!store.mark_superseded(first.id, Uuid::new_v4()).await.unwrap());
        assert!(!store.mark_superseded(Uuid::new_v4(), second.id).await.unwrap());

        let stored = store.get(first.id).await.unwrap().unwrap();
        assert_eq!(stored.superseded_by, Some(second.id));
        assert_eq!(stored.file_name, first.file_name);
        assert_eq!(store.list_for_garment(garment_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_modes() {
        let files = InMemoryFileRecordStore::new();
        files.set_fail_creates(true);
        let garment_id = Uuid::new_v4();
        assert!(files
            .create(&record(garment_id, Category::Render, "render_meshes.fbx"))
            .await
            .is_err());
        assert!(files.is_empty().await);

        let garments = InMemoryGarmentStateStore::new();
        let garment = Garment::new(garment_id, Uuid::new_v4(), "coat");
        garments.register_garment(&garment).await.unwrap();
        garments.set_fail_updates(true);
        assert!(garments
            .set_category_present(garment_id, Category::Render, Uuid::new_v4())
            .await
            .is_err());
        garments.set_fail_updates(false);
        assert!(garments
            .set_category_present(garment_id, Category::Render, Uuid::new_v4())
            .await
            .is_ok());
    }
}
