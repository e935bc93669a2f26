use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_ELIGIBLE`,
    /// `CAPACITY_EXCEEDED`, `TOKEN_MISSING`, `TOKEN_INVALID`, `PERMISSION_DENIED`,
    /// `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_ELIGIBLE")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Contest is not live")]
    pub message: String,
    /// Recommendation rejections, one message per failed rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!(["Contest is not live"]))]
    pub non_field_errors: Option<Vec<String>>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            non_field_errors: None,
        }
    }

    fn rejection(code: &'static str, message: String) -> Self {
        Self {
            code,
            non_field_errors: Some(vec![message.clone()]),
            message,
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// The contest, film or recommend window does not admit this action.
    NotEligible(String),
    /// The caller's curation list is already full.
    CapacityExceeded(String),
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::NotEligible(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::rejection("NOT_ELIGIBLE", msg),
            ),
            AppError::CapacityExceeded(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::rejection("CAPACITY_EXCEEDED", msg),
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("PERMISSION_DENIED", "Insufficient permissions"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
