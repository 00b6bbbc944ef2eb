//! Login handler issuing bearer tokens.
use crate::{
    arguments::AppConfig,
    types::{
        handler::ApiError,
        jwt::{sign_token, Claims},
    },
};
use axum::{extract::Extension, Json};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Issue a signed token for an arbitrary login payload.
pub async fn login(
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    // The payload is not authenticated against anything; it is carried
    // verbatim in the claims, as the consuming frontends expect.
    let user = match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let claims = Claims::issue(user);
    debug!("issuing token with {claims}");

    let token =
        sign_token(&claims, config.jwt_encoding_key()).map_err(|_| ApiError::TokenSigning)?;

    Ok(Json(json!({ "token": token })))
}
