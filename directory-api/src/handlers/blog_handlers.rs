//! Sub-resource handlers layered on the blog repository.
use super::resource_handlers::parse_key;
use crate::types::{
    handler::{ApiError, Store},
    jwt::Claims,
};
use axum::Json;
use chrono::Utc;
use directory_database::{
    resource::ResourceSpec,
    types::{Comment, LikeAction},
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Reaction request body.
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub action: Option<String>,
}

/// Apply a like or unlike to a blog and report the resulting counter.
pub async fn like_blog(
    spec: &'static ResourceSpec,
    store: Store,
    _claims: Claims,
    id: String,
    request: LikeRequest,
) -> Result<Json<Value>, ApiError> {
    let key = parse_key(&id)?;

    let action = request
        .action
        .as_deref()
        .unwrap_or_default()
        .parse::<LikeAction>()
        .map_err(|_| ApiError::InvalidAction)?;

    let likes = store
        .adjust_likes(spec, &key, action)
        .await?
        .ok_or(ApiError::NotFound)?;

    debug!("blog {id} now has {likes} likes");

    Ok(Json(json!({ "likes": likes })))
}

/// Comments of one blog, oldest first.
pub async fn list_comments(
    spec: &'static ResourceSpec,
    store: Store,
    id: String,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let key = parse_key(&id)?;

    let comments = store
        .comments(spec, &key)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(comments))
}

/// Comment request body.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub author: Option<String>,
    pub text: Option<String>,
}

/// Append a comment to a blog; author and text are both required.
pub async fn add_comment(
    spec: &'static ResourceSpec,
    store: Store,
    _claims: Claims,
    id: String,
    request: CommentRequest,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let key = parse_key(&id)?;

    let (author, text) = match (blank_to_none(request.author), blank_to_none(request.text)) {
        (Some(author), Some(text)) => (author, text),
        _ => return Err(ApiError::MissingFields("author, text".to_owned())),
    };

    let comment = Comment::new(author, text, Utc::now());
    if !store.push_comment(spec, &key, &comment).await? {
        return Err(ApiError::NotFound);
    }

    Ok((StatusCode::CREATED, Json(comment)))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
