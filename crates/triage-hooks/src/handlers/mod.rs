//! Request handlers.
//!
//! [`hooks`] exposes the lifecycle operations as pure validation calls that
//! return the transformed proposal; [`occurrences`] is the host commit path
//! that runs the same operation and then writes through the store.

pub mod hooks;
pub mod occurrences;
pub mod types;

use tracing::warn;

use crate::error::HookError;

/// Log a rejection the way the host trace does, then convert it.
fn rejected(operation: &'static str) -> impl Fn(triage_core::Error) -> HookError {
  move |e| {
    warn!(operation, kind = ?e.kind(), "occurrence {operation} rejected: {e}");
    HookError::from(e)
  }
}

fn store_error<E>(e: E) -> HookError
where
  E: std::error::Error + Send + Sync + 'static,
{
  HookError::Store(Box::new(e))
}
