//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs over the in-memory stores and the local credential issuer,
//! so no database or object store is needed:
//! `cargo test -p drape-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use drape_api::constants;
use drape_api::setup::routes;
use drape_api::state::AppState;
use drape_api::CoordinatorDeps;
use drape_core::models::{Garment, Owner};
use drape_core::{Config, ReadyNotifier};
use drape_db::{
    GarmentStateStore, InMemoryFileRecordStore, InMemoryGarmentStateStore, InMemoryOwnerDirectory,
    OwnerDirectory,
};
use drape_storage::{
    CredentialIssuer, LocalCredentialIssuer, StorageBackend, StorageError, StorageResult,
    WriteCredential,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const TEST_SIGNING_SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const TEST_STORAGE_BASE_URL: &str = "http://localhost:4000/objects";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn files_path(owner_id: Uuid, garment_id: Uuid) -> String {
    api_path(&format!("/owners/{}/garments/{}/files", owner_id, garment_id))
}

pub fn status_path(garment_id: Uuid) -> String {
    api_path(&format!("/garments/{}/status", garment_id))
}

/// Notifier remembering every garment it was told about
#[derive(Default)]
pub struct RecordingNotifier {
    pub notified: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl ReadyNotifier for RecordingNotifier {
    async fn notify_ready(&self, garment_id: Uuid) -> Result<(), String> {
        self.notified.lock().await.push(garment_id);
        Ok(())
    }
}

/// Issuer that always fails, standing in for an unreachable object store
pub struct FailingIssuer;

#[async_trait]
impl CredentialIssuer for FailingIssuer {
    async fn issue_write_credential(
        &self,
        _object_key: &str,
        _ttl: Duration,
    ) -> StorageResult<WriteCredential> {
        Err(StorageError::BackendError(
            "connection refused by signer at 10.0.0.12".to_string(),
        ))
    }

    fn bucket(&self) -> &str {
        "unreachable"
    }

    fn storage_url(&self, object_key: &str) -> String {
        format!("s3://unreachable/{}", object_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Options for building a test app
#[derive(Default)]
pub struct TestAppOptions {
    pub expose_server_errors: bool,
    pub failing_issuer: bool,
    pub extra_config: Vec<(&'static str, &'static str)>,
}

/// Test application: server plus handles on the in-memory stores.
pub struct TestApp {
    pub server: TestServer,
    pub owners: InMemoryOwnerDirectory,
    pub garments: InMemoryGarmentStateStore,
    pub files: InMemoryFileRecordStore,
    pub notifier: Arc<RecordingNotifier>,
    pub owner_id: Uuid,
    pub garment_id: Uuid,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Register another empty garment for the seeded owner
    pub async fn add_garment(&self) -> Uuid {
        let garment_id = Uuid::new_v4();
        self.garments
            .register_garment(&Garment::new(garment_id, self.owner_id, "extra garment"))
            .await
            .expect("Failed to register garment");
        garment_id
    }

    pub async fn notified(&self) -> Vec<Uuid> {
        self.notifier.notified.lock().await.clone()
    }
}

pub fn create_test_config(options: &TestAppOptions) -> Config {
    let mut values: HashMap<&str, String> = HashMap::from([
        ("STATE_BACKEND", "memory".to_string()),
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_BASE_URL", TEST_STORAGE_BASE_URL.to_string()),
        ("LOCAL_SIGNING_SECRET", TEST_SIGNING_SECRET.to_string()),
        (
            "EXPOSE_SERVER_ERRORS",
            options.expose_server_errors.to_string(),
        ),
    ]);
    for (key, value) in &options.extra_config {
        values.insert(*key, value.to_string());
    }

    Config::from_lookup(|key| values.get(key).cloned()).expect("Failed to build test config")
}

/// Setup a test app with one owner and one empty garment.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions {
        expose_server_errors: true,
        ..Default::default()
    })
    .await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let config = create_test_config(&options);

    let owners = InMemoryOwnerDirectory::new();
    let garments = InMemoryGarmentStateStore::new();
    let files = InMemoryFileRecordStore::new();
    let notifier = Arc::new(RecordingNotifier::default());

    let owner_id = Uuid::new_v4();
    let garment_id = Uuid::new_v4();
    owners
        .register_owner(&Owner {
            id: owner_id,
            name: "test atelier".to_string(),
        })
        .await
        .expect("Failed to register owner");
    garments
        .register_garment(&Garment::new(garment_id, owner_id, "test garment"))
        .await
        .expect("Failed to register garment");

    let issuer: Arc<dyn CredentialIssuer> = if options.failing_issuer {
        Arc::new(FailingIssuer)
    } else {
        Arc::new(
            LocalCredentialIssuer::new(TEST_STORAGE_BASE_URL.to_string(), TEST_SIGNING_SECRET)
                .expect("Failed to create local issuer"),
        )
    };

    let deps = CoordinatorDeps {
        owners: Arc::new(owners.clone()),
        garments: Arc::new(garments.clone()),
        files: Arc::new(files.clone()),
        issuer,
    };
    let state = Arc::new(AppState::new(config.clone(), deps, notifier.clone()));

    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        owners,
        garments,
        files,
        notifier,
        owner_id,
        garment_id,
    }
}
