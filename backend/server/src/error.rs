use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt document {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Gave up after {0} conflicting commits")]
    Contended(usize),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Already added")]
    DuplicateEntry,

    #[error("Maximum of {0} featured categories reached")]
    CapacityExceeded(usize),

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Server error")]
    StoreFailure(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateEntry
            | AppError::CapacityExceeded { .. }
            | AppError::InvalidInput { .. }
            | AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::StoreFailure(ref cause) => {
                error!("Store failure: {cause:?}");

                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
