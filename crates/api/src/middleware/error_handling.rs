//! # Error Handling Middleware
//!
//! Maps `CourtError` onto HTTP status codes and JSON error bodies, so every
//! handler reports failures the same way.
//!
//! The status code is picked from the error variant alone. Field-level
//! validation failures are returned verbatim under `details`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courtside_core::errors::CourtError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use courtside_api::middleware::error_handling::AppError;
/// use courtside_core::errors::CourtError;
///
/// async fn handler() -> Result<Json<()>, AppError> {
///     Err(CourtError::NotFound("Facility not found".to_string()).into())
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub CourtError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CourtError::NotFound(_) => StatusCode::NOT_FOUND,
            CourtError::Validation(_) => StatusCode::BAD_REQUEST,
            CourtError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CourtError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CourtError::Authorization(_) => StatusCode::FORBIDDEN,
            CourtError::Conflict(_) => StatusCode::CONFLICT,
            CourtError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CourtError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }

        let body = match &self.0 {
            CourtError::InvalidInput(errors) => json!({ "error": message, "details": errors }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `CourtResult` inside handlers.
impl From<CourtError> for AppError {
    fn from(err: CourtError) -> Self {
        AppError(err)
    }
}

/// Infrastructure failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CourtError::Database(err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError(CourtError::InvalidInput(err))
    }
}

/// Maps a CourtError to an HTTP response
pub fn map_error(err: CourtError) -> Response {
    AppError(err).into_response()
}
