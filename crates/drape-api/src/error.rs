//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<Response, HttpAppError>`. Use `AppError`
//! (or types that implement `Into<AppError>`) for errors so they render consistently
//! (status, body, logging).
//!
//! Server-error messages are redacted by [`server_error_policy`] rather than here, so the
//! policy comes from configuration instead of the process environment.

use axum::{
    body::Body,
    extract::rejection::{JsonRejection, PathRejection},
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use drape_core::{AppError, ErrorMetadata, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

/// Body returned when a response cannot be serialized.
pub const MARSHAL_FALLBACK_BODY: &str =
    r#"{"status_code":500,"message":"the server has encountered an unexpected error"}"#;

#[derive(Debug, Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status_code: u16,
    pub message: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from drape-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// Convert malformed path parameters (e.g. non-UUID ids) into a 400.
impl From<PathRejection> for HttpAppError {
    fn from(rejection: PathRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid path parameter: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

/// Marker attached to every rendered error so the redaction layer can rebuild the body.
#[derive(Debug, Clone, Copy)]
pub struct RenderedError {
    pub code: &'static str,
    pub recoverable: bool,
    /// Message carries dependency detail that must not reach clients
    pub sensitive: bool,
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let rendered = RenderedError {
            code: app_error.error_code(),
            recoverable: app_error.is_recoverable(),
            sensitive: app_error.is_sensitive(),
        };
        let body = ErrorResponse {
            status_code: status.as_u16(),
            message: app_error.client_message(),
            code: rendered.code.to_string(),
            recoverable: rendered.recoverable,
        };

        let mut response = marshal_response(status, &body);
        response.extensions_mut().insert(rendered);
        response
    }
}

/// Serialize `body` as JSON with `status`.
///
/// Serialization failure yields a 500 with [`MARSHAL_FALLBACK_BODY`] and never
/// leaks the underlying error to the client.
pub fn marshal_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_bytes(status, bytes),
        Err(e) => {
            let err = AppError::MarshalingFailed(e.to_string());
            log_error(&err);
            json_bytes(
                StatusCode::INTERNAL_SERVER_ERROR,
                MARSHAL_FALLBACK_BODY.as_bytes().to_vec(),
            )
        }
    }
}

fn json_bytes(status: StatusCode, bytes: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from(bytes),
    )
        .into_response()
}

/// Whether server-error details reach the client
#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    pub expose_server_errors: bool,
}

/// Replace sensitive error messages with the status' reason phrase unless server errors are exposed.
///
/// Only dependency failures are sensitive; client errors always pass through so
/// they keep naming the offending identifier.
pub async fn server_error_policy(
    State(policy): State<ErrorPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if policy.expose_server_errors {
        return response;
    }

    let Some(rendered) = response
        .extensions()
        .get::<RenderedError>()
        .copied()
        .filter(|rendered| rendered.sensitive)
    else {
        return response;
    };

    let status = response.status();

    let body = ErrorResponse {
        status_code: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string(),
        code: rendered.code.to_string(),
        recoverable: rendered.recoverable,
    };
    let mut redacted = marshal_response(status, &body);
    redacted.extensions_mut().insert(rendered);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;
    use uuid::Uuid;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot encode"))
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_marshal_failure_uses_fixed_body() {
        let response = marshal_response(StatusCode::OK, &Unserializable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, MARSHAL_FALLBACK_BODY);
    }

    #[tokio::test]
    async fn test_client_error_names_identifier() {
        let id = Uuid::new_v4();
        let response = HttpAppError(AppError::GarmentNotFound(id)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let rendered = response.extensions().get::<RenderedError>().copied().unwrap();
        assert!(!rendered.sensitive);

        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.status_code, 404);
        assert_eq!(body.code, "GARMENT_NOT_FOUND");
        assert!(body.message.contains(&id.to_string()));
    }

    #[tokio::test]
    async fn test_server_error_keeps_detail_before_redaction() {
        let response =
            HttpAppError(AppError::PersistenceFailed("pool timed out".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<RenderedError>().unwrap().sensitive);

        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.message.contains("pool timed out"));
        assert!(body.recoverable);
    }
}
