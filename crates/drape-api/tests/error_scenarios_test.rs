//! Error scenario integration tests.
//!
//! Run with: `cargo test -p drape-api --test error_scenarios_test`

mod helpers;

use drape_api::error::ErrorResponse;
use helpers::{files_path, setup_test_app, setup_test_app_with, status_path, TestAppOptions};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_unsupported_file_is_400_and_names_file() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "random.txt", "file_extension": "txt" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.status_code, 400);
    assert_eq!(body.code, "UNSUPPORTED_FILE_TYPE");
    assert!(body.message.contains("random.txt"));
    assert!(app.files.is_empty().await);
}

#[tokio::test]
async fn test_unknown_owner_is_404() {
    let app = setup_test_app().await;
    let owner_id = Uuid::new_v4();

    let response = app
        .client()
        .post(&files_path(owner_id, app.garment_id))
        .json(&json!({ "file_name": "start_meshes.obj", "file_extension": "obj" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.code, "OWNER_NOT_FOUND");
    assert!(body.message.contains(&owner_id.to_string()));
}

#[tokio::test]
async fn test_unknown_garment_is_404() {
    let app = setup_test_app().await;
    let garment_id = Uuid::new_v4();

    let response = app
        .client()
        .post(&files_path(app.owner_id, garment_id))
        .json(&json!({ "file_name": "start_meshes.obj", "file_extension": "obj" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.code, "GARMENT_NOT_FOUND");
    assert!(body.message.contains(&garment_id.to_string()));
}

#[tokio::test]
async fn test_malformed_ids_and_bodies_are_400() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&helpers::api_path(&format!(
            "/owners/not-a-uuid/garments/{}/files",
            app.garment_id
        )))
        .json(&json!({ "file_name": "start_meshes.obj" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<ErrorResponse>().code, "INVALID_INPUT");

    let response = app
        .client()
        .get(&helpers::api_path("/garments/42/status"))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_extension": "obj" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<ErrorResponse>().code, "INVALID_INPUT");

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "", "file_extension": "obj" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_credential_failure_is_500_and_creates_nothing() {
    let app = setup_test_app_with(TestAppOptions {
        expose_server_errors: true,
        failing_issuer: true,
        ..Default::default()
    })
    .await;

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "start_meshes.obj", "file_extension": "obj" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.code, "CREDENTIAL_ISSUANCE_FAILED");
    assert!(body.recoverable);
    assert!(body.message.contains("connection refused"));

    assert!(app.files.is_empty().await);
    let status = app
        .client()
        .get(&status_path(app.garment_id))
        .await
        .json::<drape_core::models::GarmentStatusResponse>();
    assert!(status.categories.iter().all(|c| !c.present));
}

#[tokio::test]
async fn test_server_errors_redacted_when_not_exposed() {
    let app = setup_test_app_with(TestAppOptions {
        expose_server_errors: false,
        failing_issuer: true,
        ..Default::default()
    })
    .await;

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "start_meshes.obj", "file_extension": "obj" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.message, "Internal Server Error");
    assert_eq!(body.code, "CREDENTIAL_ISSUANCE_FAILED");
    assert!(!response.text().contains("10.0.0.12"));
}

#[tokio::test]
async fn test_client_errors_not_redacted_when_server_errors_hidden() {
    let app = setup_test_app_with(TestAppOptions {
        expose_server_errors: false,
        ..Default::default()
    })
    .await;

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "random.txt", "file_extension": "txt" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.json::<ErrorResponse>().message.contains("random.txt"));
}

#[tokio::test]
async fn test_persistence_failure_leaves_flags_untouched() {
    let app = setup_test_app().await;
    app.files.set_fail_creates(true);

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "start_meshes.obj", "file_extension": "obj" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<ErrorResponse>().code, "PERSISTENCE_FAILED");

    let status = app
        .client()
        .get(&status_path(app.garment_id))
        .await
        .json::<drape_core::models::GarmentStatusResponse>();
    assert!(status.categories.iter().all(|c| !c.present));
}

#[tokio::test]
async fn test_state_update_failure_keeps_record() {
    let app = setup_test_app().await;
    app.garments.set_fail_updates(true);

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "render_meshes.fbx", "file_extension": "fbx" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<ErrorResponse>().code, "STATE_UPDATE_FAILED");
    assert_eq!(app.files.len().await, 1);
    assert!(app.notified().await.is_empty());
}

#[tokio::test]
async fn test_category_override_changes_classification() {
    let app = setup_test_app_with(TestAppOptions {
        expose_server_errors: true,
        extra_config: vec![("CATEGORY_RENDER_FILE", "final_render.fbx")],
        ..Default::default()
    })
    .await;

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "render_meshes.fbx", "file_extension": "fbx" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .post(&files_path(app.owner_id, app.garment_id))
        .json(&json!({ "file_name": "final_render.fbx", "file_extension": "fbx" }))
        .await;
    assert_eq!(response.status_code(), 200);
}
