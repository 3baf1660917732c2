use crate::api::models::analyses::ValidationError;
use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Submission failed input validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Shared-secret gate rejected the request
    #[error("Unauthorized: invalid API key")]
    InvalidApiKey,

    /// Rate limiter rejected the request
    #[error("{message}")]
    TooManyRequests { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidApiKey => StatusCode::FORBIDDEN,
            Error::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(err) => err.to_string(),
            Error::InvalidApiKey => "Unauthorized: invalid API key".to_string(),
            Error::TooManyRequests { message } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Internal server error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::InvalidApiKey => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::TooManyRequests { .. } => {
                tracing::info!("Rate limited: {}", self);
            }
            Error::Validation(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        // Storage failures keep the backend detail text alongside the
        // generic message; everything else is just the user-safe message.
        let body = match &self {
            Error::Database(DbError::Other(err)) => json!({
                "error": self.user_message(),
                "details": format!("{err:#}"),
            }),
            _ => json!({ "error": self.user_message() }),
        };

        (status, axum::response::Json(body)).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
