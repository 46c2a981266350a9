use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Why a gain cannot be logged for a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("already done today")]
    AlreadyDoneToday,
    #[error("weekly limit reached")]
    WeeklyLimitReached { count: usize, max_per_week: u32 },
}

/// The storage collaborator rejected or could not reach its data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

impl StorageError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error("a request for {0} is already pending")]
    Busy(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "validation_error",
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "storage_failure",
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let (status, code) = match &err {
            LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            LedgerError::Rule(_) => (StatusCode::UNPROCESSABLE_ENTITY, "rule_violation"),
            LedgerError::Busy(_) => (StatusCode::CONFLICT, "busy"),
            LedgerError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            LedgerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failure"),
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
