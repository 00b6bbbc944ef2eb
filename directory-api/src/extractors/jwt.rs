use crate::{
    arguments::AppConfig,
    types::jwt::{AuthError, Claims},
};
use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use jsonwebtoken::{decode, Validation};
use std::sync::Arc;

/// Extractor that verifies the bearer credential on protected routes.
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingAuth)?;

        let config = parts
            .extensions
            .get::<Arc<AppConfig>>()
            .expect("Missing Extension(Arc<AppConfig>)");

        decode::<Claims>(bearer.token(), config.jwt_decoding_key(), &Validation::default())
            .map(|token| token.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
