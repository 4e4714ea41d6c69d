//! API error types and their HTTP mappings
//!
//! Only client-side problems surface as error responses. Downstream API
//! failures never reach this type: the lookup handlers degrade to stale
//! cache data or the documented fallback payloads instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::data::ZipError;

/// Errors returned to API consumers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The ZIP code path parameter was malformed
    #[error("Invalid ZIP code: '{0}' (expected exactly 5 digits)")]
    InvalidZip(String),

    /// The address query parameter was missing or empty
    #[error("Missing required 'address' query parameter")]
    MissingAddress,

    /// The name path parameter was empty
    #[error("Missing member name")]
    MissingName,
}

impl From<ZipError> for ApiError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::InvalidFormat(zip) => ApiError::InvalidZip(zip),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidZip(_) | ApiError::MissingAddress | ApiError::MissingName => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
