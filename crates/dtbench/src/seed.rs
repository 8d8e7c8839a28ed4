//! Deterministic per-partition seeding.

use chrono::Utc;
use docstore::DocumentStore;
use tracing::{debug, info};

use crate::{error::Result, record::DowntimeRecord};

/// Records inserted into each partition by a seeding run.
pub const RECORDS_PER_PARTITION: usize = 2;

/// Inserts a deterministic set of records across partitions.
///
/// For partition `i` named `Team{i:02}` the seeder inserts `{team}01` with
/// count 2 and `{team}02` with count 3, each as an independently constructed
/// record. After seeding, each partition's counts sum to 5.
pub struct DocumentSeeder<'a> {
  store: &'a dyn DocumentStore,
  collection: String,
}

impl<'a> DocumentSeeder<'a> {
  pub fn new(store: &'a dyn DocumentStore, collection: impl Into<String>) -> Self {
    Self {
      store,
      collection: collection.into(),
    }
  }

  /// Seed `partition_count` partitions sequentially, two inserts each, and
  /// return the number of documents inserted.
  ///
  /// The first failed insert aborts the run; already-seeded partitions stay
  /// behind.
  #[tracing::instrument(level = "trace", skip(self))]
  pub async fn seed(&self, partition_count: usize) -> Result<usize> {
    info!(collection = %self.collection, partitions = partition_count, "seeding");
    for i in 0..partition_count {
      let team = DowntimeRecord::team_name(i);
      self.insert(&DowntimeRecord::new(&team, 1, 2, Utc::now())).await?;
      self.insert(&DowntimeRecord::new(&team, 2, 3, Utc::now())).await?;
    }
    let inserted = partition_count * RECORDS_PER_PARTITION;
    info!(collection = %self.collection, inserted, "seeding complete");
    Ok(inserted)
  }

  async fn insert(&self, record: &DowntimeRecord) -> Result<()> {
    debug!(
      collection = %self.collection,
      id = %record.id,
      team = %record.team_id,
      count = record.count,
      "inserting record"
    );
    let document = serde_json::to_value(record)?;
    self.store.insert(&self.collection, record.partition_key(), &document).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use docstore::{DocumentStore, Filter, MemoryStore, TypedQuery};

  use super::*;
  use crate::{provision::CollectionProvisioner, record::fields};

  async fn provisioned() -> MemoryStore {
    let store = MemoryStore::new();
    CollectionProvisioner::new(&store)
      .reset(DowntimeRecord::COLLECTION, Some(DowntimeRecord::PARTITION_KEY_PATH), 10000)
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn test_seed_inserts_two_records_per_partition() {
    let store = provisioned().await;
    let inserted = DocumentSeeder::new(&store, DowntimeRecord::COLLECTION).seed(3).await.unwrap();
    assert_eq!(inserted, 6);
    assert_eq!(store.document_count(DowntimeRecord::COLLECTION).await, Some(6));
  }

  #[tokio::test]
  async fn test_each_partition_sums_to_five() {
    let store = provisioned().await;
    DocumentSeeder::new(&store, DowntimeRecord::COLLECTION).seed(3).await.unwrap();
    for i in 0..3 {
      let query = TypedQuery::new()
        .filter(Filter::eq(fields::TEAM_ID, DowntimeRecord::team_name(i)))
        .sum(fields::COUNT);
      let sum = store.query_aggregate(DowntimeRecord::COLLECTION, &query).await.unwrap();
      assert_eq!(sum, Some(5));
    }
  }

  #[tokio::test]
  async fn test_reseeding_without_reset_conflicts_on_existing_ids() {
    let store = provisioned().await;
    let seeder = DocumentSeeder::new(&store, DowntimeRecord::COLLECTION);
    seeder.seed(1).await.unwrap();
    assert!(seeder.seed(1).await.is_err());
    // The failed run left the original two documents untouched
    assert_eq!(store.document_count(DowntimeRecord::COLLECTION).await, Some(2));
  }
}
