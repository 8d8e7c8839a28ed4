//! Client layer for a partitioned remote document store.
//!
//! The [`DocumentStore`] trait is the seam the rest of the workspace works
//! against: collection lifecycle, partition-scoped inserts, and the two query
//! paths (raw statement text and structured aggregate). Two implementations
//! are provided:
//!
//! - [`RestStore`] talks to a remote store over JSON HTTP.
//! - [`MemoryStore`] keeps collections in process, with honest semantics for
//!   every trait operation. Used by tests and offline runs.

pub mod error;
pub mod memory;
pub mod rest;
pub mod statement;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::DocumentStore;
pub use types::{
  AggregateQuery, CollectionInfo, CollectionSpec, CreateOptions, Filter, Param, RawQuery, Row, Scalar, TypedQuery,
  row_from_json, scalar_sum,
};
