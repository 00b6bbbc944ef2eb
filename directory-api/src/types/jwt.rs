/*!
JWT types and trait implementations.
*/
use crate::DIRECTORY_API_TARGET;
use axum::response::{IntoResponse, Json, Response};
use chrono::{Duration, Utc};
use http::StatusCode;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use tracing::{event, Level};

/// How long an issued token stays valid.
const TOKEN_VALIDITY_HOURS: i64 = 2;

/// Claims carried in the bearer token. The login payload is opaque to
/// the service; only the expiry is interpreted.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: Map<String, Value>,
    /// Expiration date time in unix epoch seconds.
    pub exp: i64,
}

impl Claims {
    /// Wrap a login payload with the standard validity window.
    pub fn issue(user: Map<String, Value>) -> Self {
        Self {
            user,
            exp: (Utc::now() + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp(),
        }
    }
}

impl Display for Claims {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "claims expiring at epoch {}", self.exp)
    }
}

/// Sign claims into a compact bearer token.
pub fn sign_token(
    claims: &Claims,
    key: &EncodingKey,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::default(), claims, key)
}

/// Error type for authorization failures. A missing credential and a
/// credential that fails verification are different outcomes.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization")]
    MissingAuth,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        event!(
            target: DIRECTORY_API_TARGET,
            Level::ERROR,
            "Authorization failed: {self}"
        );

        let status = match self {
            Self::MissingAuth => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
        };

        (status, Json(json!({ "message": format!("{self}") }))).into_response()
    }
}
