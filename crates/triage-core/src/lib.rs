//! Lifecycle and integrity rules for occurrences held in an external record
//! store.
//!
//! The invocation harness calls one of the [`lifecycle`] operations around
//! each create, update or delete. The operation either approves the change
//! (possibly filling in derived attributes on the proposal) or rejects it
//! with an [`Error`]. This crate is deliberately free of HTTP and database
//! dependencies; the store is reached only through [`store::OccurrenceStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod deadline;
pub mod duplicate;
pub mod error;
pub mod field;
pub mod immutable;
pub mod lifecycle;
pub mod occurrence;
pub mod schema;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use field::Field;
pub use lifecycle::{OccurrenceRules, Outcome};
