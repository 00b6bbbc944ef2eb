//! Status transitions on disaster reports.
use super::resource_handlers::parse_key;
use crate::types::{
    handler::{ApiError, Store},
    jwt::Claims,
};
use axum::Json;
use chrono::Utc;
use directory_database::{
    database::UpdateReport,
    resource::ResourceSpec,
    types::ReportStatus,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Status request body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

/// Move a report to a new workflow status, restamping its update time.
pub async fn set_status(
    spec: &'static ResourceSpec,
    store: Store,
    _claims: Claims,
    id: String,
    request: StatusRequest,
) -> Result<Json<UpdateReport>, ApiError> {
    let key = parse_key(&id)?;

    let status = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse::<ReportStatus>()
        .map_err(|_| ApiError::InvalidStatus)?;

    let mut fields = Map::new();
    fields.insert(
        "status".to_owned(),
        Value::String(status.as_str().to_owned()),
    );
    let fields = spec.prepare_update(fields, Utc::now());

    let report = store.update(spec, &key, fields).await?;
    if report.matched == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(report))
}
