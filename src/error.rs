//! HTTP error mapping.
//!
//! Handlers return `ApiResult<T>`; every failure becomes a status code and a
//! `{"detail": ...}` body here. Server-side failures are logged with full
//! detail and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::users::repo::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailConflict,

    /// Request body or path failed to parse or validate.
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmailTaken => ApiError::EmailConflict,
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmailConflict => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Database(_) => "Database error".into(),
            ApiError::Unexpected(_) => "Unexpected error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => error!(error = ?e, "database error"),
            ApiError::Unexpected(msg) => error!(error = %msg, "unexpected error"),
            ApiError::Validation(msg) => warn!(detail = %msg, "request rejected"),
            _ => {}
        }
        let body = Json(ErrorBody {
            detail: self.detail(),
        });
        (self.status(), body).into_response()
    }
}
