//! Handlers for `/occurrences`: the host commit path.
//!
//! Each mutation runs the matching lifecycle operation first and only writes
//! through the store when it was not rejected.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/occurrences` | returns 201 + stored record |
//! | `GET`    | `/occurrences/{id}` | |
//! | `PATCH`  | `/occurrences/{id}` | partial body; pre-image read from the store |
//! | `DELETE` | `/occurrences/{id}` | returns 204 |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use tracing::info;
use triage_core::{
  OccurrenceRules,
  occurrence::{Occurrence, RecordRef},
  store::OccurrenceStore,
};
use uuid::Uuid;

use super::{rejected, store_error};
use crate::{AppState, error::HookError};

async fn fetch<S: OccurrenceStore>(store: &S, id: Uuid) -> Result<Occurrence, HookError> {
  store
    .retrieve(id, None)
    .await
    .map_err(store_error)?
    .ok_or_else(|| HookError::NotFound(format!("occurrence {id} not found")))
}

/// `POST /occurrences`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  proposal: Result<Json<Occurrence>, JsonRejection>,
) -> Result<impl IntoResponse, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(mut proposal) = proposal?;
  proposal.entity = state.schema.entity.clone();
  proposal.id = None;

  OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_create(&mut proposal)
    .await
    .map_err(rejected("create"))?;

  let id = state.store.create(proposal).await.map_err(store_error)?;
  info!(%id, "occurrence created");
  let stored = fetch(state.store.as_ref(), id).await?;
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /occurrences/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Occurrence>, HookError>
where
  S: OccurrenceStore + 'static,
{
  Ok(Json(fetch(state.store.as_ref(), id).await?))
}

/// `PATCH /occurrences/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  proposal: Result<Json<Occurrence>, JsonRejection>,
) -> Result<Json<Occurrence>, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(mut proposal) = proposal?;
  proposal.entity = state.schema.entity.clone();
  proposal.id = Some(id);

  OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_update(&mut proposal, None)
    .await
    .map_err(rejected("update"))?;

  state.store.update(proposal).await.map_err(store_error)?;
  info!(%id, "occurrence updated");
  Ok(Json(fetch(state.store.as_ref(), id).await?))
}

/// `DELETE /occurrences/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, HookError>
where
  S: OccurrenceStore + 'static,
{
  let target = RecordRef { entity: state.schema.entity.clone(), id };
  OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_delete(&target)
    .await
    .map_err(rejected("delete"))?;

  state.store.delete(id).await.map_err(store_error)?;
  info!(%id, "occurrence deleted");
  Ok(StatusCode::NO_CONTENT)
}
