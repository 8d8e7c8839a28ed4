use async_trait::async_trait;

use crate::{
  error::Result,
  types::{AggregateQuery, CollectionInfo, CollectionSpec, CreateOptions, RawQuery, Row},
};

/// The remote document-store surface the workspace consumes.
///
/// Implementations are expected to honor the error taxonomy in
/// [`StoreError`](crate::StoreError): deleting an absent collection is
/// `NotFound`, creating an incompatible one or re-inserting an existing id
/// within a partition is `Conflict`, everything else propagates as-is.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Delete a collection. `Err(NotFound)` when it does not exist.
  async fn delete_collection(&self, name: &str) -> Result<()>;

  /// Create a collection, or accept an existing one with a compatible shape.
  ///
  /// Returns the store-reported shape so callers can verify the declared
  /// partition key path and throughput.
  async fn create_collection_if_not_exists(&self, spec: CollectionSpec, options: CreateOptions)
  -> Result<CollectionInfo>;

  /// Insert one document into the partition identified by `partition_key`.
  ///
  /// The partition key value is supplied on every insert; the store does not
  /// infer it from document content.
  async fn insert(&self, collection: &str, partition_key: &str, document: &serde_json::Value) -> Result<()>;

  /// Execute a raw statement and fully materialize its untyped rows.
  async fn query_raw(&self, collection: &str, query: &RawQuery) -> Result<Vec<Row>>;

  /// Execute a structured filter-then-sum query.
  ///
  /// `Ok(None)` means no document matched; callers decide how to normalize.
  async fn query_aggregate(&self, collection: &str, query: &AggregateQuery) -> Result<Option<i64>>;
}
