//! In-process [`DocumentStore`] used by tests and offline runs.
//!
//! Collections live behind a [`tokio::sync::RwLock`]. Semantics mirror the
//! remote store where it matters: deleting an absent collection is
//! `NotFound`, re-creating an existing collection with a different partition
//! key path is `Conflict`, duplicate ids within a partition are `Conflict`,
//! and a partition key value that contradicts the document's own routing
//! field is rejected. Raw queries support the aggregate statement shape the
//! benchmark emits; see [`crate::statement`].

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
  error::{Result, StoreError},
  statement::SumStatement,
  store::DocumentStore,
  types::{AggregateQuery, CollectionInfo, CollectionSpec, CreateOptions, Filter, RawQuery, Row, Scalar},
};

struct StoredDoc {
  partition_key: String,
  id: String,
  body: serde_json::Value,
}

struct StoredCollection {
  info: CollectionInfo,
  docs: Vec<StoredDoc>,
}

/// In-memory document store.
#[derive(Default)]
pub struct MemoryStore {
  collections: RwLock<HashMap<String, StoredCollection>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of documents currently stored in a collection.
  pub async fn document_count(&self, collection: &str) -> Option<usize> {
    let collections = self.collections.read().await;
    collections.get(collection).map(|c| c.docs.len())
  }

  /// Declared shape of a collection, if it exists.
  pub async fn collection_info(&self, collection: &str) -> Option<CollectionInfo> {
    let collections = self.collections.read().await;
    collections.get(collection).map(|c| c.info.clone())
  }
}

/// Filter-and-sum over a collection's documents.
///
/// Returns how many documents matched and the sum of the numeric values of
/// `sum_field` across them; non-numeric and missing fields contribute
/// nothing, matching the store's aggregate semantics.
fn sum_docs(docs: &[StoredDoc], filter: Option<(&str, &Scalar)>, sum_field: &str) -> (usize, i64) {
  let mut matched = 0usize;
  let mut sum = 0i64;
  for doc in docs {
    if let Some((field, value)) = filter {
      let field_value = doc.body.get(field).and_then(Scalar::from_json);
      if field_value.as_ref() != Some(value) {
        continue;
      }
    }
    matched += 1;
    match doc.body.get(sum_field).and_then(Scalar::from_json) {
      Some(Scalar::Int(n)) => sum += n,
      Some(Scalar::Float(f)) => sum += f as i64,
      _ => {}
    }
  }
  (matched, sum)
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
  async fn delete_collection(&self, name: &str) -> Result<()> {
    let mut collections = self.collections.write().await;
    match collections.remove(name) {
      Some(_) => {
        debug!(collection = name, "collection deleted");
        Ok(())
      }
      None => Err(StoreError::NotFound(name.to_string())),
    }
  }

  async fn create_collection_if_not_exists(
    &self,
    spec: CollectionSpec,
    options: CreateOptions,
  ) -> Result<CollectionInfo> {
    let mut collections = self.collections.write().await;
    if let Some(existing) = collections.get(&spec.id) {
      if existing.info.partition_key_path != spec.partition_key_path {
        return Err(StoreError::Conflict(format!(
          "collection {} exists with partition key {:?}",
          spec.id, existing.info.partition_key_path
        )));
      }
      return Ok(existing.info.clone());
    }

    let info = CollectionInfo {
      id: spec.id.clone(),
      partition_key_path: spec.partition_key_path,
      throughput_units: options.throughput_units,
    };
    debug!(collection = %info.id, partition_key = ?info.partition_key_path, "collection created");
    collections.insert(spec.id, StoredCollection {
      info: info.clone(),
      docs: Vec::new(),
    });
    Ok(info)
  }

  async fn insert(&self, collection: &str, partition_key: &str, document: &serde_json::Value) -> Result<()> {
    let id = document
      .get("id")
      .and_then(|v| v.as_str())
      .ok_or_else(|| StoreError::InvalidDocument("missing string id".to_string()))?;

    let mut collections = self.collections.write().await;
    let stored = collections
      .get_mut(collection)
      .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;

    // The supplied partition key must agree with the document's routing field.
    if let Some(path) = &stored.info.partition_key_path {
      let field = path.trim_start_matches('/');
      let routed = document.get(field).and_then(|v| v.as_str());
      if routed != Some(partition_key) {
        return Err(StoreError::InvalidDocument(format!(
          "partition key {partition_key:?} does not match document field {field} = {routed:?}"
        )));
      }
    }

    if stored
      .docs
      .iter()
      .any(|d| d.partition_key == partition_key && d.id == id)
    {
      return Err(StoreError::Conflict(format!("{collection}/{partition_key}/{id}")));
    }

    stored.docs.push(StoredDoc {
      partition_key: partition_key.to_string(),
      id: id.to_string(),
      body: document.clone(),
    });
    Ok(())
  }

  async fn query_raw(&self, collection: &str, query: &RawQuery) -> Result<Vec<Row>> {
    let stmt = SumStatement::parse(&query.text)?;
    let filter = stmt.resolve(query)?;

    let collections = self.collections.read().await;
    let stored = collections
      .get(collection)
      .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;

    let filter_ref = filter.as_ref().map(|(field, value)| (field.as_str(), value));
    let (matched, sum) = sum_docs(&stored.docs, filter_ref, &stmt.sum_field);
    if matched == 0 {
      return Ok(Vec::new());
    }
    Ok(vec![Row::from([("$1".to_string(), Scalar::Int(sum))])])
  }

  async fn query_aggregate(&self, collection: &str, query: &AggregateQuery) -> Result<Option<i64>> {
    let collections = self.collections.read().await;
    let stored = collections
      .get(collection)
      .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;

    let filter_ref = query
      .filter
      .as_ref()
      .map(|Filter::Eq { field, value }| (field.as_str(), value));
    let (matched, sum) = sum_docs(&stored.docs, filter_ref, &query.sum_field);
    Ok(if matched == 0 { None } else { Some(sum) })
  }
}
