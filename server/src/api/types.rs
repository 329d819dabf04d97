//! Shared API types
//!
//! Common types used across all API endpoints including error handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::data::DataError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a data layer error to its API representation.
    ///
    /// Schema mismatches and rejected table names carry enough context to be
    /// actionable; everything else is logged and collapsed to a generic
    /// internal error.
    pub fn from_data(e: DataError) -> Self {
        match e {
            DataError::SchemaMismatch { .. } => Self::ServiceUnavailable {
                message: e.to_string(),
            },
            DataError::InvalidTableName(_) => {
                Self::bad_request("INVALID_TABLE_NAME", e.to_string())
            }
            e => {
                tracing::error!(error = %e, "Data error");
                Self::Internal {
                    message: "Warehouse operation failed".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
