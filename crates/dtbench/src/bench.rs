//! Timed execution of the two equivalent aggregate query paths.

use std::time::Instant;

use docstore::{DocumentStore, Filter, RawQuery, TypedQuery, scalar_sum};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::Result, record::fields};

/// Outcome of one query path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
  /// Aggregated sum, normalized to zero when nothing matched.
  pub sum: i64,
  /// Wall-clock time from query build to full materialization.
  pub elapsed_ms: u64,
  /// Result rows materialized (raw path only).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rows: Option<usize>,
}

/// Outcome of one benchmark run: both paths plus the cross-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchOutcome {
  pub team_id: String,
  pub raw: QueryOutcome,
  pub typed: QueryOutcome,
  /// Whether the two paths returned the same sum.
  pub paths_agree: bool,
}

/// Runs the raw-statement and structured query paths against one collection
/// and times each independently.
///
/// The paths execute one after the other, never concurrently, and both must
/// run against an unchanged dataset; seeding and benchmarking are separate
/// phases.
pub struct QueryBenchmark<'a> {
  store: &'a dyn DocumentStore,
  collection: String,
}

impl<'a> QueryBenchmark<'a> {
  pub fn new(store: &'a dyn DocumentStore, collection: impl Into<String>) -> Self {
    Self {
      store,
      collection: collection.into(),
    }
  }

  /// Execute both paths for `team_id` and cross-check their sums.
  ///
  /// A team with no seeded documents reads as zero on both paths, not as an
  /// error and not as null.
  #[tracing::instrument(level = "trace", skip(self))]
  pub async fn run(&self, team_id: &str) -> Result<BenchOutcome> {
    let raw = self.run_raw(team_id).await?;
    let typed = self.run_typed(team_id).await?;

    let paths_agree = raw.sum == typed.sum;
    if !paths_agree {
      warn!(raw = raw.sum, typed = typed.sum, team_id, "query paths disagree");
    }

    Ok(BenchOutcome {
      team_id: team_id.to_string(),
      raw,
      typed,
      paths_agree,
    })
  }

  /// Raw path: parameterized aggregate statement, executed as text.
  async fn run_raw(&self, team_id: &str) -> Result<QueryOutcome> {
    let started = Instant::now();
    let query = RawQuery::new(format!(
      "SELECT VALUE SUM(c.{}) FROM c WHERE c.{} = @teamId",
      fields::COUNT,
      fields::TEAM_ID
    ))
    .bind("@teamId", team_id);

    let rows = self.store.query_raw(&self.collection, &query).await?;
    // Empty result set and null sum both normalize to zero
    let sum = scalar_sum(&rows).unwrap_or(0);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    debug!(collection = %self.collection, team_id, sum, elapsed_ms, "raw path done");
    Ok(QueryOutcome {
      sum,
      elapsed_ms,
      rows: Some(rows.len()),
    })
  }

  /// Structured path: typed filter-then-sum over the entity's fields.
  async fn run_typed(&self, team_id: &str) -> Result<QueryOutcome> {
    let started = Instant::now();
    let query = TypedQuery::new()
      .filter(Filter::eq(fields::TEAM_ID, team_id))
      .sum(fields::COUNT);

    let sum = self.store.query_aggregate(&self.collection, &query).await?.unwrap_or(0);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    debug!(collection = %self.collection, team_id, sum, elapsed_ms, "typed path done");
    Ok(QueryOutcome {
      sum,
      elapsed_ms,
      rows: None,
    })
  }
}

#[cfg(test)]
mod tests {
  use docstore::MemoryStore;

  use super::*;
  use crate::{provision::CollectionProvisioner, record::DowntimeRecord, seed::DocumentSeeder};

  async fn seeded(partitions: usize) -> MemoryStore {
    let store = MemoryStore::new();
    CollectionProvisioner::new(&store)
      .reset(DowntimeRecord::COLLECTION, Some(DowntimeRecord::PARTITION_KEY_PATH), 10000)
      .await
      .unwrap();
    DocumentSeeder::new(&store, DowntimeRecord::COLLECTION)
      .seed(partitions)
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn test_both_paths_agree_on_a_seeded_partition() {
    let store = seeded(1).await;
    let outcome = QueryBenchmark::new(&store, DowntimeRecord::COLLECTION).run("Team00").await.unwrap();
    assert_eq!(outcome.raw.sum, 5);
    assert_eq!(outcome.typed.sum, 5);
    assert!(outcome.paths_agree);
    assert_eq!(outcome.raw.rows, Some(1));
  }

  #[tokio::test]
  async fn test_unseeded_team_normalizes_to_zero_on_both_paths() {
    let store = seeded(1).await;
    let outcome = QueryBenchmark::new(&store, DowntimeRecord::COLLECTION).run("Team99").await.unwrap();
    assert_eq!(outcome.raw.sum, 0);
    assert_eq!(outcome.typed.sum, 0);
    assert!(outcome.paths_agree);
    assert_eq!(outcome.raw.rows, Some(0));
  }
}
