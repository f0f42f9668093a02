//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{API_BASE, API_PREFIX, HTTP_CONCURRENCY_LIMIT, MAX_REQUEST_BODY_BYTES};
use crate::error::{server_error_policy, ErrorPolicy};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use drape_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let error_policy = ErrorPolicy {
        expose_server_errors: config.expose_server_errors(),
    };

    let api_routes = Router::new()
        .route(
            "/owners/{owner_id}/garments/{garment_id}/files",
            post(handlers::garment_files::upload_garment_file),
        )
        .route(
            "/garments/{garment_id}/status",
            get(handlers::garment_status::get_garment_status),
        );

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/openapi.json", API_BASE),
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(API_PREFIX, api_routes)
        .layer(axum::middleware::from_fn_with_state(
            error_policy,
            server_error_policy,
        ))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
