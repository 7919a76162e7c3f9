use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{AsRefStr, Display};
use tracing::error;
use utoipa::ToSchema;

/// Message returned when a purchase order reuses an existing order number.
pub const DUPLICATE_ORDER_NUMBER: &str = "the order number must be unique";

/// Error envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "code": 409,
    "error": "the order number must be unique"
}))]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    #[schema(example = 409)]
    pub code: u16,
    /// Client-facing error description
    #[schema(example = "the order number must be unique")]
    pub error: String,
}

/// Classification of a failed store round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoreErrorKind {
    /// The statement matched no row.
    RowNotFound,
    /// The insert succeeded at the driver level but wrote nothing.
    NotAffected,
    ForeignKeyViolation,
    UniqueViolation,
    /// Anything else the driver reported.
    Other,
}

/// Error raised by the repositories. Carries the driver's message untouched so
/// that the handler boundary decides what reaches the client.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn row_not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::RowNotFound, message)
    }

    pub fn not_affected() -> Self {
        Self::new(StoreErrorKind::NotAffected, "no rows affected")
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(msg) => Self::row_not_found(msg),
            DbErr::RecordNotInserted => Self::not_affected(),
            other => match other.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                    Self::new(StoreErrorKind::ForeignKeyViolation, msg)
                }
                Some(SqlErr::UniqueConstraintViolation(msg)) => {
                    Self::new(StoreErrorKind::UniqueViolation, msg)
                }
                _ => Self::new(StoreErrorKind::Other, other.to_string()),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error ({}): {0}", .0.kind)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(err) => match err.kind {
                StoreErrorKind::ForeignKeyViolation | StoreErrorKind::UniqueViolation => {
                    StatusCode::CONFLICT
                }
                StoreErrorKind::RowNotFound => StatusCode::NOT_FOUND,
                StoreErrorKind::NotAffected | StoreErrorKind::Other => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Unclassified store failures return a generic message; constraint
    /// violations keep the store's wording.
    pub fn response_message(&self) -> String {
        match self {
            Self::ValidationError(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Store(err) => match err.kind {
                StoreErrorKind::Other => "database error".to_string(),
                _ => err.message.clone(),
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Store(err) = &self {
            error!(kind = %err.kind, status = status.as_u16(), "store error: {}", err.message);
        }

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.response_message(),
        };

        (status, Json(body)).into_response()
    }
}
