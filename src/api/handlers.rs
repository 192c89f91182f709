use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::{error, info, warn};
use serde_json::Value;

use crate::resource::{self, FieldError, ResourceDef};
use crate::service::ResourceService;
use crate::store::{Record, StoreError};

use super::error::ApiError;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list(State(service): State<Arc<ResourceService>>) -> Result<Json<Value>, ApiError> {
    let def = service.def();
    let rows = service.get_all().await?;
    let items = rows.iter().map(|row| resource::serialize(def, row)).collect();
    Ok(Json(Value::Array(items)))
}

pub async fn create(
    State(service): State<Arc<ResourceService>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let def = service.def();
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = resource::validate_create(def, &body).inspect_err(|e| log_rejected(def, e))?;
    let row = service.insert(record).await?;
    let id = row_id(def, &row)?;
    info!("Table {}: Item with id {} created.", def.table, id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, def.location(id))],
        Json(resource::serialize(def, &row)),
    )
        .into_response())
}

pub async fn get_one(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (_, row) = find(&service, &id).await?;
    Ok(Json(resource::serialize(service.def(), &row)))
}

pub async fn delete(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let (id, _) = find(&service, &id).await?;
    if service.delete(id).await? == 0 {
        return Err(not_found(&service, id));
    }
    info!("Table {}: with id {} deleted.", service.def().table, id);
    Ok(StatusCode::NO_CONTENT)
}

/// The record must exist before the body is looked at, so an unknown id is
/// a 404 even when the body is also invalid.
pub async fn update(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let (id, _) = find(&service, &id).await?;
    let def = service.def();
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let fields = resource::validate_update(def, &body).inspect_err(|e| log_rejected(def, e))?;
    if service.update(id, fields).await? == 0 {
        return Err(not_found(&service, id));
    }
    info!("Table {}: with id {} updated.", def.table, id);
    Ok(StatusCode::NO_CONTENT)
}

/// Looks up a record by its path id. Ids that are not integers cannot
/// match a row and are reported as not found.
async fn find(service: &ResourceService, raw_id: &str) -> Result<(i64, Record), ApiError> {
    let def = service.def();
    let Ok(id) = raw_id.parse::<i64>() else {
        error!("Table {} with id {} not found.", def.table, raw_id);
        return Err(ApiError::NotFound(def.messages.not_found.clone()));
    };
    match service.get_by_id(id).await? {
        Some(row) => Ok((id, row)),
        None => Err(not_found(service, id)),
    }
}

fn not_found(service: &ResourceService, id: i64) -> ApiError {
    let def = service.def();
    error!("Table {} with id {} not found.", def.table, id);
    ApiError::NotFound(def.messages.not_found.clone())
}

fn row_id(def: &ResourceDef, row: &Record) -> Result<i64, ApiError> {
    row.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::Store(StoreError::MissingId(def.table.clone())))
}

fn log_rejected(def: &ResourceDef, err: &FieldError) {
    match err {
        FieldError::Missing { field, .. } => error!("Table {}: {} is required", def.table, field),
        FieldError::Invalid { field, message } => {
            error!("Table {}: invalid {}: {}", def.table, field, message)
        }
        FieldError::NoUpdateFields(_) => warn!("Invalid update without required fields"),
        FieldError::NotAnObject => warn!("Table {}: request body is not an object", def.table),
    }
}
