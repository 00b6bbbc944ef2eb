//! CRUD handlers shared by every resource family.
use crate::types::{
    handler::{ApiError, Store},
    jwt::Claims,
};
use axum::Json;
use chrono::Utc;
use directory_database::{
    database::UpdateReport,
    resource::ResourceSpec,
    types::{Page, PageRequest, ResourceKey},
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

type HandlerResult<T> = Result<T, ApiError>;

/// Reject malformed identifiers before they reach the store.
pub(crate) fn parse_key(raw: &str) -> Result<ResourceKey, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

pub(crate) fn as_object(payload: Value) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::NotAnObject),
    }
}

/// List every document of one family.
pub async fn list_resources(
    spec: &'static ResourceSpec,
    store: Store,
) -> HandlerResult<Json<Vec<Value>>> {
    let docs = store.list(spec).await?;
    Ok(Json(docs))
}

/// Raw pagination query values; invalid numbers fall back to defaults.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// One pagination window over a family.
pub async fn page_resources(
    spec: &'static ResourceSpec,
    store: Store,
    params: PageParams,
) -> HandlerResult<Json<Page>> {
    let request = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());
    let page = store.page(spec, request).await?;
    Ok(Json(page))
}

/// Lookup one document by identifier.
pub async fn get_resource(
    spec: &'static ResourceSpec,
    store: Store,
    id: String,
) -> HandlerResult<Json<Value>> {
    let key = parse_key(&id)?;

    let doc = store
        .find(spec, &key)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(doc))
}

/// Create one document from a client payload.
pub async fn create_resource(
    spec: &'static ResourceSpec,
    store: Store,
    claims: Claims,
    payload: Value,
) -> HandlerResult<(StatusCode, Json<Value>)> {
    debug!("creating {} document for {claims}", spec.path);

    let doc = spec.prepare_insert(as_object(payload)?, Utc::now())?;
    let key = store.insert(spec, doc).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "insertedId": key.to_string() })),
    ))
}

/// Overwrite named fields of one document; set-semantics, so fields not
/// mentioned in the payload are left alone.
pub async fn update_resource(
    spec: &'static ResourceSpec,
    store: Store,
    _claims: Claims,
    id: String,
    payload: Value,
) -> HandlerResult<Json<UpdateReport>> {
    let key = parse_key(&id)?;

    let fields = spec.prepare_update(as_object(payload)?, Utc::now());
    if fields.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    let report = store.update(spec, &key, fields).await?;
    if report.matched == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(report))
}

/// Delete one document by identifier.
pub async fn delete_resource(
    spec: &'static ResourceSpec,
    store: Store,
    _claims: Claims,
    id: String,
) -> HandlerResult<Json<Value>> {
    let key = parse_key(&id)?;

    let deleted = store.remove(spec, &key).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "deletedCount": deleted })))
}
