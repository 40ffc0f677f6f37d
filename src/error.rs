use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// A single field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Uniform response envelope used by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<serde_json::Value> {
    pub fn failure(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

/// Tagged error kinds produced by the validation, access-control and
/// service layers. Handlers never build HTTP responses themselves; every
/// failure funnels through the single [`IntoResponse`] mapping below.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{field} already exists")]
    Conflict { field: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            if db.is_unique_violation() {
                let field = db
                    .constraint()
                    .and_then(constraint_field)
                    .unwrap_or_else(|| "value".to_string());
                return ApiError::Conflict { field };
            }
        }
        ApiError::Internal(err.into())
    }
}

/// Extracts the column name from a `<table>_<column>_key` unique
/// constraint name.
fn constraint_field(constraint: &str) -> Option<String> {
    constraint
        .strip_suffix("_key")?
        .split_once('_')
        .map(|(_, field)| field.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Emitted inside the per-request tracing span, so method and path
        // ride along on every log line.
        let status = self.status();
        let (message, errors) = match self {
            ApiError::Validation(errs) => {
                tracing::warn!(errors = ?errs, "validation failed");
                ("Validation failed".to_string(), Some(errs))
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                let message = if production() {
                    "Internal server error".to_string()
                } else {
                    err.to_string()
                };
                (message, None)
            }
            other => {
                tracing::warn!(%status, error = %other, "request failed");
                (other.to_string(), None)
            }
        };

        (status, Json(Envelope::failure(message, errors))).into_response()
    }
}

fn production() -> bool {
    std::env::var("APP_ENV").as_deref() == Ok("production")
}
