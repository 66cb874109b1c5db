//! API Error Handling
//! Mission: Map every failure onto the response envelope, leaking nothing
//!
//! One status per failure class: authn and authz failures are both 401 (a
//! caller cannot tell missing token, bad token, and wrong role apart), and
//! validation failures carry a generic message with no field detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::validation::ValidationError;

/// Failure taxonomy for every handler
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input; always surfaced generically
    Validation(ValidationError),
    /// Business-rule violation with a caller-facing message
    BadRequest(&'static str),
    /// Missing/invalid token, wrong role, or bad credentials
    Unauthorized(&'static str),
    NotFound(&'static str),
    Conflict(&'static str),
    /// Unexpected failure; detail is logged, never returned
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => {
                tracing::debug!(field = err.field, detail = err.message, "Validation failed");
                (StatusCode::BAD_REQUEST, "Validation error")
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "message": message,
                "timestamp": Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation(ValidationError {
                    field: "rating",
                    message: "Max 5",
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::BadRequest("Owner already has a store"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("Authentication required"),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::NotFound("Store not found"), StatusCode::NOT_FOUND),
            (
                ApiError::Conflict("Email already exists"),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ApiError = anyhow::anyhow!("database exploded").into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_validation_conversion() {
        let err: ApiError = ValidationError {
            field: "email",
            message: "Invalid email",
        }
        .into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
