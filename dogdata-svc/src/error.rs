//! Error types for dogdata-svc
//!
//! Every failure of a lifecycle operation is one of these variants and is
//! converted to an HTTP status plus `{"error": message}` body at the
//! handler boundary. Nothing here is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::{AgeRange, Gender};

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input (400)
    #[error("{0}")]
    Validation(String),

    /// Candidate interval intersects an existing one (400)
    #[error("Overlapping age range exists for breed '{breed}' ({gender}): {candidate} intersects {existing}")]
    OverlapConflict {
        breed: String,
        gender: Gender,
        existing: AgeRange,
        candidate: AgeRange,
    },

    /// No record matches the requested key (404)
    #[error("{0}")]
    NotFound(String),

    /// The store cannot be reached (500)
    #[error("Could not connect to the database: {0}")]
    DependencyUnavailable(String),

    /// Any other storage failure (500, opaque to clients)
    #[error("Storage failure: {0}")]
    Storage(#[source] sqlx::Error),

    /// Stored data could not be decoded (500, opaque to clients)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Error::DependencyUnavailable(err.to_string())
            }
            other => Error::Storage(other),
        }
    }
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::OverlapConflict { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DependencyUnavailable(_) | Error::Storage(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients
    ///
    /// Storage and decoding failures are logged in full and replaced by an
    /// opaque message.
    pub fn client_message(&self) -> String {
        match self {
            Error::DependencyUnavailable(_) => "Could not connect to the database".to_string(),
            Error::Storage(_) | Error::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.client_message(),
        }));

        (status, body).into_response()
    }
}
