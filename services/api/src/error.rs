//! Error type shared by every API handler

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by the API handlers
///
/// Every variant renders as `{"success": false, "message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected input
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Absent, hidden or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// The request clashes with existing state
    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests from this IP, please try again later.")]
    TooManyRequests,

    #[error("Internal server error")]
    InternalServerError,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    /// Not-found answer for owner-scoped mutations; identical for absent and foreign documents
    pub fn not_owned(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found or unauthorized"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Database(DatabaseError::Duplicate(_)) => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn duplicate_message(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("{}{} already exists", first.to_uppercase(), chars.as_str()),
        None => "Duplicate value".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Database(DatabaseError::Duplicate(field)) => duplicate_message(&field),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                "Server Error".to_string()
            }
            ApiError::InternalServerError => "Server Error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Malformed ids cannot name a document, so they read as absent
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path rejected: {}", rejection.body_text());
        ApiError::NotFound("Resource not found".to_string())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
