use crate::error::{marshal_response, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};
use drape_core::models::GarmentStatusResponse;
use drape_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Get per-category completion of a garment
#[utoipa::path(
    get,
    path = "/api/v0/garments/{garment_id}/status",
    tag = "garments",
    params(
        ("garment_id" = Uuid, Path, description = "Garment ID")
    ),
    responses(
        (status = 200, description = "Garment status", body = GarmentStatusResponse),
        (status = 404, description = "Garment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, path), fields(operation = "get_garment_status"))]
pub async fn get_garment_status(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, HttpAppError> {
    let Path(garment_id) = path?;

    let garment = state
        .garments
        .get(garment_id)
        .await?
        .ok_or(AppError::GarmentNotFound(garment_id))?;

    Ok(marshal_response(
        StatusCode::OK,
        &GarmentStatusResponse::new(&garment, state.coordinator.categories()),
    ))
}
