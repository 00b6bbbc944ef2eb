//! Types for handler functions.
use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use directory_database::{
    database::{DirectoryStore, StoreError},
    resource::MissingFields,
};
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{event, Level};

/// Common error type for handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid identifier")]
    InvalidId,
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("No fields to update")]
    EmptyUpdate,
    #[error("Invalid action")]
    InvalidAction,
    #[error("Invalid status")]
    InvalidStatus,
    #[error("Resource not found")]
    NotFound,
    #[error("Token signing failed")]
    TokenSigning,
    #[error("Store error: `{0}`")]
    Store(#[from] StoreError),
}

impl From<MissingFields> for ApiError {
    fn from(missing: MissingFields) -> Self {
        Self::MissingFields(missing.0.join(", "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::TokenSigning => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        // Store failures keep their detail in the log, not the response.
        let message = match &self {
            Self::Store(e) => {
                event!(Level::ERROR, "Server error: {e}");
                "Server error".to_owned()
            }
            other => format!("{other}"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Type alias for the injected directory store.
pub type Store = Extension<Arc<dyn DirectoryStore>>;
