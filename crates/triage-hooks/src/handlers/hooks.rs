//! Handlers for the `/hooks` endpoints, one per mutation point.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/hooks/create` | `{"target": <occurrence>}` |
//! | `POST` | `/hooks/update` | `{"target": <occurrence>, "pre_image": <occurrence>?}` |
//! | `POST` | `/hooks/delete` | `{"target": {"entity": "...", "id": "..."}}` |
//!
//! A `200` reply means the change may be committed; create and update echo
//! the proposal with any derived attributes filled in. Rejections come back
//! as `422` (or `500` for store failures) and must abort the commit. A body
//! that is not a valid request of the expected shape is a `400`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use triage_core::{
  OccurrenceRules, Outcome,
  occurrence::{Occurrence, RecordRef},
  store::OccurrenceStore,
};

use super::rejected;
use crate::{AppState, error::HookError};

#[derive(Debug, Deserialize)]
pub struct CreateHookBody {
  pub target: Occurrence,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHookBody {
  pub target:    Occurrence,
  /// The record as it was before this change. Read from the store by
  /// `target.id` when omitted.
  #[serde(default)]
  pub pre_image: Option<Occurrence>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteHookBody {
  pub target: RecordRef,
}

#[derive(Debug, Serialize)]
pub struct HookReply {
  pub outcome: Outcome,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target:  Option<Occurrence>,
}

/// `POST /hooks/create`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<CreateHookBody>, JsonRejection>,
) -> Result<Json<HookReply>, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(body) = body?;
  let mut target = body.target;
  let outcome = OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_create(&mut target)
    .await
    .map_err(rejected("create"))?;
  Ok(Json(HookReply { outcome, target: Some(target) }))
}

/// `POST /hooks/update`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<UpdateHookBody>, JsonRejection>,
) -> Result<Json<HookReply>, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(body) = body?;
  let mut target = body.target;
  let pre_image_id = body.pre_image.as_ref().and_then(|p| p.id);
  if state.schema.manages(&target.entity) && target.id.or(pre_image_id).is_none() {
    return Err(HookError::BadRequest("update target has no id".into()));
  }
  let outcome = OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_update(&mut target, body.pre_image.as_ref())
    .await
    .map_err(rejected("update"))?;
  Ok(Json(HookReply { outcome, target: Some(target) }))
}

/// `POST /hooks/delete`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<DeleteHookBody>, JsonRejection>,
) -> Result<Json<HookReply>, HookError>
where
  S: OccurrenceStore + 'static,
{
  let Json(body) = body?;
  let outcome = OccurrenceRules::new(state.store.as_ref(), &state.schema)
    .on_delete(&body.target)
    .await
    .map_err(rejected("delete"))?;
  Ok(Json(HookReply { outcome, target: None }))
}
