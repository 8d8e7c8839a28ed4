//! Serialization and console rendering of benchmark outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bench::BenchOutcome;

/// Complete benchmark report: the outcome plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
  /// Report generation timestamp
  pub timestamp: DateTime<Utc>,
  /// Collection the queries ran against
  pub collection: String,
  #[serde(flatten)]
  pub outcome: BenchOutcome,
}

impl BenchReport {
  pub fn new(collection: impl Into<String>, outcome: BenchOutcome) -> Self {
    Self {
      timestamp: Utc::now(),
      collection: collection.into(),
      outcome,
    }
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  /// Console rendering: one line per path plus the cross-check verdict.
  pub fn render(&self) -> String {
    let raw = &self.outcome.raw;
    let typed = &self.outcome.typed;
    let mut out = String::new();
    out.push_str(&format!("collection: {}\n", self.collection));
    out.push_str(&format!("team:       {}\n", self.outcome.team_id));
    out.push_str(&format!(
      "raw         sum={}  rows={}  elapsed={}ms\n",
      raw.sum,
      raw.rows.unwrap_or(0),
      raw.elapsed_ms
    ));
    out.push_str(&format!("typed       sum={}  elapsed={}ms\n", typed.sum, typed.elapsed_ms));
    out.push_str(&format!(
      "cross-check: {}\n",
      if self.outcome.paths_agree { "paths agree" } else { "PATHS DISAGREE" }
    ));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bench::QueryOutcome;

  fn outcome() -> BenchOutcome {
    BenchOutcome {
      team_id: "Team01".to_string(),
      raw: QueryOutcome {
        sum: 5,
        elapsed_ms: 12,
        rows: Some(1),
      },
      typed: QueryOutcome {
        sum: 5,
        elapsed_ms: 9,
        rows: None,
      },
      paths_agree: true,
    }
  }

  #[test]
  fn test_json_report_flattens_outcome() {
    let report = BenchReport::new("DowntimeRecords", outcome());
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["collection"], "DowntimeRecords");
    assert_eq!(json["team_id"], "Team01");
    assert_eq!(json["raw"]["sum"], 5);
    assert_eq!(json["typed"]["sum"], 5);
    assert_eq!(json["paths_agree"], true);
    // The typed path has no row count to report
    assert!(json["typed"].get("rows").is_none());
  }

  #[test]
  fn test_render_flags_disagreement() {
    let mut outcome = outcome();
    outcome.typed.sum = 4;
    outcome.paths_agree = false;
    let report = BenchReport::new("DowntimeRecords", outcome);
    assert!(report.render().contains("PATHS DISAGREE"));
  }
}
