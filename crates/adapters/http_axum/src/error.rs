//! HTTP error response mapping.

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use stockroom_domain::error::{NotFoundError, StockroomError, ValidationError};
use stockroom_domain::id::DeviceId;

/// JSON error body returned by API endpoints.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps [`StockroomError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(StockroomError);

impl ApiError {
    /// The wrapped domain error.
    #[must_use]
    pub fn inner(&self) -> &StockroomError {
        &self.0
    }
}

impl From<StockroomError> for ApiError {
    fn from(err: StockroomError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            StockroomError::Validation(err) => {
                let status = match err {
                    ValidationError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                error_response(status, err.to_string())
            }
            StockroomError::NotFound(err) => error_response(StatusCode::NOT_FOUND, err.to_string()),
            StockroomError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            StockroomError::Photos(err) => {
                tracing::error!(error = %err, "photo store error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

/// Parse a device id taken from the URL path.
///
/// A segment that is not an integer cannot name a device, so it is reported
/// as not found rather than as a bad request.
///
/// # Errors
///
/// Returns a not-found [`ApiError`] when `raw` is not an integer.
pub fn parse_device_id(raw: &str) -> Result<DeviceId, ApiError> {
    DeviceId::from_str(raw).map_err(|_| {
        NotFoundError {
            entity: "Device",
            id: raw.to_string(),
        }
        .into()
    })
}

/// Fallback for any request whose path or verb has no handler.
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
