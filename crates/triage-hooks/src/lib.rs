//! Invocation harness for the occurrence lifecycle rules.
//!
//! Exposes an axum [`Router`] that runs the create, update and delete rules
//! on behalf of a host, either as pure validation hooks or wrapped around the
//! host's own commit path, backed by any [`OccurrenceStore`].

pub mod error;
pub mod handlers;

pub use error::HookError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use triage_core::{schema::Schema, store::OccurrenceStore};

use handlers::{hooks, occurrences, types};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub schema:     Schema,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub schema: Arc<Schema>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), schema: Arc::clone(&self.schema) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the harness router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: OccurrenceStore + 'static,
{
  Router::new()
    // Validation hooks
    .route("/hooks/create", post(hooks::create::<S>))
    .route("/hooks/update", post(hooks::update::<S>))
    .route("/hooks/delete", post(hooks::delete::<S>))
    // Host commit path
    .route("/occurrences", post(occurrences::create::<S>))
    .route(
      "/occurrences/{id}",
      get(occurrences::get_one::<S>)
        .patch(occurrences::update::<S>)
        .delete(occurrences::delete_one::<S>),
    )
    // Reference data
    .route("/types", post(types::create::<S>))
    .route("/types/{id}", get(types::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
