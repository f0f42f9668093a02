use crate::error::{marshal_response, ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::UploadRequest;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};
use drape_core::models::{UploadFileRequest, UploadFileResponse};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Register a garment file and get a presigned URL to upload it
#[utoipa::path(
    post,
    path = "/api/v0/owners/{owner_id}/garments/{garment_id}/files",
    tag = "garments",
    params(
        ("owner_id" = Uuid, Path, description = "Owner ID"),
        ("garment_id" = Uuid, Path, description = "Garment ID")
    ),
    request_body = UploadFileRequest,
    responses(
        (status = 200, description = "File registered", body = UploadFileResponse),
        (status = 400, description = "Invalid input or unsupported file", body = ErrorResponse),
        (status = 404, description = "Owner or garment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_garment_file(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    ValidatedJson(request): ValidatedJson<UploadFileRequest>,
) -> Result<Response, HttpAppError> {
    let Path((owner_id, garment_id)) = path?;
    request.validate()?;

    let outcome = state
        .coordinator
        .handle_upload(UploadRequest {
            owner_id,
            garment_id,
            file_name: request.file_name,
            file_extension: request.file_extension,
        })
        .await?;

    if outcome.claimed {
        if let Err(e) = state.notifier.notify_ready(garment_id).await {
            tracing::warn!(garment_id = %garment_id, error = %e, "Ready notification failed");
        }
    }

    let body = UploadFileResponse::from_record(&outcome.record, outcome.ready);
    Ok(marshal_response(StatusCode::OK, &body))
}
