//! Handlers for `/types`: seeding occurrence types.

use std::num::NonZeroU32;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use triage_core::{occurrence::OccurrenceType, store::OccurrenceStore};
use uuid::Uuid;

use super::store_error;
use crate::{AppState, error::HookError};

#[derive(Debug, Deserialize)]
pub struct NewTypeBody {
  /// Response window in hours, at least one; omit to use the configured
  /// default.
  #[serde(default)]
  pub deadline_hours: Option<NonZeroU32>,
}

/// `POST /types`: returns 201 + the stored type.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewTypeBody>, JsonRejection>,
) -> Result<impl IntoResponse, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(body) = body?;
  let occurrence_type = state
    .store
    .add_type(body.deadline_hours)
    .await
    .map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(occurrence_type)))
}

/// `GET /types/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<OccurrenceType>, HookError>
where
  S: OccurrenceStore + 'static,
{
  let occurrence_type = state
    .store
    .get_type(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| HookError::NotFound(format!("occurrence type {id} not found")))?;
  Ok(Json(occurrence_type))
}
