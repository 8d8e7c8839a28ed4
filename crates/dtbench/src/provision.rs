//! Idempotent collection teardown and creation.

use docstore::{CollectionInfo, CollectionSpec, CreateOptions, DocumentStore, StoreError};
use tracing::{debug, info};

use crate::error::Result;

/// Removes and recreates a named collection into a known shape.
///
/// The state machine is `Absent → (remove: no-op) → Absent → (create) →
/// Present`; there is no recovery for "exists but wrong shape" beyond the
/// store's own conflict error propagating.
pub struct CollectionProvisioner<'a> {
  store: &'a dyn DocumentStore,
}

impl<'a> CollectionProvisioner<'a> {
  pub fn new(store: &'a dyn DocumentStore) -> Self {
    Self { store }
  }

  /// Delete the collection, treating absence as an already-satisfied
  /// precondition. Every other failure propagates.
  #[tracing::instrument(level = "trace", skip(self))]
  pub async fn remove_if_exists(&self, name: &str) -> Result<()> {
    match self.store.delete_collection(name).await {
      Ok(()) => {
        debug!(collection = name, "removed existing collection");
        Ok(())
      }
      Err(StoreError::NotFound(_)) => {
        debug!(collection = name, "collection absent, nothing to remove");
        Ok(())
      }
      Err(e) => Err(e.into()),
    }
  }

  /// Create the collection unless a compatible one already exists.
  ///
  /// A partition key path makes the collection partitioned with the given
  /// throughput; without one, an unpartitioned collection is created and no
  /// throughput option is sent, since unpartitioned collections accept only
  /// the store's fixed default allocation.
  #[tracing::instrument(level = "trace", skip(self))]
  pub async fn create_if_not_exists(
    &self,
    name: &str,
    partition_key_path: Option<&str>,
    throughput_units: u32,
  ) -> Result<CollectionInfo> {
    let spec = CollectionSpec {
      id: name.to_string(),
      partition_key_path: partition_key_path.map(str::to_string),
    };
    let options = if partition_key_path.is_some() {
      CreateOptions {
        throughput_units: Some(throughput_units),
      }
    } else {
      CreateOptions::default()
    };

    let info = self.store.create_collection_if_not_exists(spec, options).await?;
    info!(
      collection = %info.id,
      partition_key = ?info.partition_key_path,
      throughput = ?info.throughput_units,
      "collection present"
    );
    Ok(info)
  }

  /// Remove-then-create: guarantees a clean `Present` state for the declared
  /// parameters, discarding any prior data.
  pub async fn reset(
    &self,
    name: &str,
    partition_key_path: Option<&str>,
    throughput_units: u32,
  ) -> Result<CollectionInfo> {
    self.remove_if_exists(name).await?;
    self.create_if_not_exists(name, partition_key_path, throughput_units).await
  }
}

#[cfg(test)]
mod tests {
  use docstore::MemoryStore;

  use super::*;

  #[tokio::test]
  async fn test_remove_missing_collection_succeeds_silently() {
    let store = MemoryStore::new();
    let provisioner = CollectionProvisioner::new(&store);
    provisioner.remove_if_exists("DowntimeRecords").await.unwrap();
  }

  #[tokio::test]
  async fn test_partitioned_creation_reports_declared_shape() {
    let store = MemoryStore::new();
    let provisioner = CollectionProvisioner::new(&store);
    let info = provisioner
      .create_if_not_exists("DowntimeRecords", Some("/teamId"), 10000)
      .await
      .unwrap();
    assert_eq!(info.partition_key_path.as_deref(), Some("/teamId"));
    assert_eq!(info.throughput_units, Some(10000));
  }

  #[tokio::test]
  async fn test_unpartitioned_creation_sends_no_throughput() {
    let store = MemoryStore::new();
    let provisioner = CollectionProvisioner::new(&store);
    let info = provisioner.create_if_not_exists("Unpartitioned", None, 10000).await.unwrap();
    assert_eq!(info.partition_key_path, None);
    assert_eq!(info.throughput_units, None);
  }

  #[tokio::test]
  async fn test_reset_twice_yields_the_same_shape() {
    let store = MemoryStore::new();
    let provisioner = CollectionProvisioner::new(&store);
    let first = provisioner.reset("DowntimeRecords", Some("/teamId"), 10000).await.unwrap();
    let second = provisioner.reset("DowntimeRecords", Some("/teamId"), 10000).await.unwrap();
    assert_eq!(first, second);
  }
}
