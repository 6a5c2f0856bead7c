use axum::{
    extract::{Path, State},
    Json,
    http::StatusCode,
};
use serde::Serialize;
use crate::server::AppState;
use crate::collection::Collection;
use crate::record::{self, FieldMap, Value};
use crate::report::{self, MonthlyTotal, TypeSummary};
use crate::storage::DbStats;
use crate::{generate_id, Error};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub collection: Collection,
    pub deleted: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Schema errors are the caller's fault, everything else is ours
fn api_error(e: Error) -> ApiError {
    let status = match e {
        Error::Schema(_) => StatusCode::BAD_REQUEST,
        Error::Storage(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    } else {
        tracing::debug!("Rejected request: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() }))
}

pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<FieldMap>>, ApiError> {
    let collection: Collection = collection.parse().map_err(api_error)?;
    let store = state.open_store().map_err(api_error)?;
    let rows = store.fetch_all_fields(collection).map_err(api_error)?;
    Ok(Json(rows))
}

/// Insert one record. An `id` is generated when the body does not carry one.
/// `null` fields count as missing.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Json(body): Json<BTreeMap<String, serde_json::Value>>,
) -> Result<(StatusCode, Json<FieldMap>), ApiError> {
    let collection: Collection = collection.parse().map_err(api_error)?;
    let mut fields = record::fields_from_json(collection, body).map_err(api_error)?;
    fields
        .entry("id".to_string())
        .or_insert_with(|| Value::Text(generate_id()));

    let store = state.open_store().map_err(api_error)?;
    let stored = store.insert_fields(collection, &fields).map_err(api_error)?;
    tracing::info!("Created {} record {}", collection, stored["id"]);
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn clear_records(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> Result<Json<ClearResponse>, ApiError> {
    let collection: Collection = collection.parse().map_err(api_error)?;
    let store = state.open_store().map_err(api_error)?;
    let deleted = store.delete_all(collection).map_err(api_error)?;
    tracing::warn!("Cleared {} rows from {}", deleted, collection);
    Ok(Json(ClearResponse { collection, deleted }))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<DbStats>, ApiError> {
    let store = state.open_store().map_err(api_error)?;
    let stats = store.stats().map_err(api_error)?;
    Ok(Json(stats))
}

pub async fn get_cash_flow(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    let store = state.open_store().map_err(api_error)?;
    let projects = store.projects().map_err(api_error)?;
    Ok(Json(report::cash_flow(&projects)))
}

pub async fn get_project_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TypeSummary>>, ApiError> {
    let store = state.open_store().map_err(api_error)?;
    let projects = store.projects().map_err(api_error)?;
    Ok(Json(report::by_project_type(&projects)))
}
