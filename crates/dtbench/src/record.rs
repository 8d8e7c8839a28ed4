//! The seeded entity and its fixed partition-key strategy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire field names, shared by typed queries and the raw statement builder
/// so both paths stay bound to the same serialized shape.
pub mod fields {
  pub const TEAM_ID: &str = "teamId";
  pub const COUNT: &str = "count";
}

/// A single downtime observation for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeRecord {
  /// Partition key value; groups records by team.
  #[serde(rename = "teamId")]
  pub team_id: String,
  /// Observation time. Informational only.
  pub time: DateTime<Utc>,
  /// Measure aggregated per partition.
  pub count: i64,
  /// Unique within a partition: `{team_id}{seq:02}`.
  pub id: String,
}

impl DowntimeRecord {
  /// Partition key path the collection is declared on. Must match the
  /// serialized name of [`Self::team_id`]; a different path would
  /// desynchronize collection partitioning from query routing.
  pub const PARTITION_KEY_PATH: &'static str = "/teamId";

  /// Default collection name, derived from the entity.
  pub const COLLECTION: &'static str = "DowntimeRecords";

  pub fn new(team_id: impl Into<String>, seq: u8, count: i64, time: DateTime<Utc>) -> Self {
    let team_id = team_id.into();
    let id = format!("{team_id}{seq:02}");
    Self {
      team_id,
      time,
      count,
      id,
    }
  }

  /// The partition key value for this record. Fixed to the team id; no
  /// other derivation is permitted.
  pub fn partition_key(&self) -> &str {
    &self.team_id
  }

  /// Zero-padded team name for seeding slot `i`: `Team00`, `Team01`, ...
  pub fn team_name(i: usize) -> String {
    format!("Team{i:02}")
  }
}
