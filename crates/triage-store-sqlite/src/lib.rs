//! SQLite backend for the occurrence record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Table and column names come from the
//! [`Schema`](triage_core::schema::Schema) the store is opened with.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
