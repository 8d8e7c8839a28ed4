//! Wire-level types shared by every store implementation: collection specs,
//! untyped result rows, and the two query forms.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untyped scalar as it appears in a raw query result.
///
/// Raw results are schema-less; representing them as a closed variant set
/// keeps the raw and structured paths comparably typed at the point where
/// their outputs are cross-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Timestamp(DateTime<Utc>),
  Str(String),
}

impl Scalar {
  /// Map a JSON value to a scalar. RFC 3339 strings become timestamps;
  /// arrays and objects have no scalar representation and yield `None`.
  pub fn from_json(value: &serde_json::Value) -> Option<Self> {
    match value {
      serde_json::Value::Null => Some(Scalar::Null),
      serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
      serde_json::Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          Some(Scalar::Int(i))
        } else {
          n.as_f64().map(Scalar::Float)
        }
      }
      serde_json::Value::String(s) => Some(match s.parse::<DateTime<Utc>>() {
        Ok(ts) => Scalar::Timestamp(ts),
        Err(_) => Scalar::Str(s.clone()),
      }),
      _ => None,
    }
  }
}

impl From<&str> for Scalar {
  fn from(value: &str) -> Self {
    Scalar::Str(value.to_string())
  }
}

impl From<String> for Scalar {
  fn from(value: String) -> Self {
    Scalar::Str(value)
  }
}

impl From<i64> for Scalar {
  fn from(value: i64) -> Self {
    Scalar::Int(value)
  }
}

impl From<f64> for Scalar {
  fn from(value: f64) -> Self {
    Scalar::Float(value)
  }
}

impl From<bool> for Scalar {
  fn from(value: bool) -> Self {
    Scalar::Bool(value)
  }
}

impl From<DateTime<Utc>> for Scalar {
  fn from(value: DateTime<Utc>) -> Self {
    Scalar::Timestamp(value)
  }
}

/// One untyped result row: field name to scalar value.
pub type Row = BTreeMap<String, Scalar>;

/// Convert a JSON result element into a [`Row`].
///
/// Objects map field-by-field (non-scalar fields are dropped); a bare scalar,
/// as produced by a `SELECT VALUE` projection, surfaces under the synthetic
/// column name `$1`.
pub fn row_from_json(value: &serde_json::Value) -> Row {
  match value {
    serde_json::Value::Object(map) => map
      .iter()
      .filter_map(|(k, v)| Scalar::from_json(v).map(|s| (k.clone(), s)))
      .collect(),
    other => Scalar::from_json(other)
      .map(|s| Row::from([("$1".to_string(), s)]))
      .unwrap_or_default(),
  }
}

/// Extract the scalar aggregate from a raw result set.
///
/// A `SELECT VALUE SUM(...)` result is a single one-column row. An empty
/// result set and a null sum both read as `None`, so callers normalize the
/// two cases identically.
pub fn scalar_sum(rows: &[Row]) -> Option<i64> {
  let row = rows.first()?;
  if row.len() != 1 {
    return None;
  }
  match row.values().next()? {
    Scalar::Int(n) => Some(*n),
    Scalar::Float(f) => Some(*f as i64),
    _ => None,
  }
}

/// Requested shape of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSpec {
  pub id: String,
  /// Partition key path (e.g. `/teamId`). `None` creates an unpartitioned
  /// collection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub partition_key_path: Option<String>,
}

/// Options sent alongside collection creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
  /// Provisioned throughput. Unpartitioned collections accept only the
  /// store's fixed default allocation, so callers omit this for them.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub throughput_units: Option<u32>,
}

/// Shape of a collection as reported back by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub partition_key_path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub throughput_units: Option<u32>,
}

/// A named query parameter (`@name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
  pub name: String,
  pub value: Scalar,
}

/// A query expressed in the store's query language, executed as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuery {
  pub text: String,
  #[serde(default)]
  pub parameters: Vec<Param>,
}

impl RawQuery {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      parameters: Vec::new(),
    }
  }

  /// Bind a named parameter. Names carry their `@` prefix, matching how they
  /// appear in the statement text.
  pub fn bind(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
    self.parameters.push(Param {
      name: name.into(),
      value: value.into(),
    });
    self
  }
}

/// Structured filter over document fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
  Eq { field: String, value: Scalar },
}

impl Filter {
  pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
    Filter::Eq {
      field: field.into(),
      value: value.into(),
    }
  }
}

/// Builder for the structured query path: filter, then aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedQuery {
  filter: Option<Filter>,
}

impl TypedQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn filter(mut self, filter: Filter) -> Self {
    self.filter = Some(filter);
    self
  }

  /// Finish the composition with a sum over the given field.
  pub fn sum(self, field: impl Into<String>) -> AggregateQuery {
    AggregateQuery {
      filter: self.filter,
      sum_field: field.into(),
    }
  }
}

/// A fully composed filter-then-sum query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filter: Option<Filter>,
  pub sum_field: String,
}

impl AggregateQuery {
  /// Lower to the equivalent raw statement.
  ///
  /// Remote stores execute structured queries through the same wire
  /// operation as raw text; the lowering happens client-side and is part of
  /// the structured path's measured cost.
  pub fn to_raw(&self) -> RawQuery {
    match &self.filter {
      Some(Filter::Eq { field, value }) => RawQuery::new(format!(
        "SELECT VALUE SUM(c.{}) FROM c WHERE c.{} = @p0",
        self.sum_field, field
      ))
      .bind("@p0", value.clone()),
      None => RawQuery::new(format!("SELECT VALUE SUM(c.{}) FROM c", self.sum_field)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_scalar_from_json() {
    assert_eq!(Scalar::from_json(&serde_json::json!(null)), Some(Scalar::Null));
    assert_eq!(Scalar::from_json(&serde_json::json!(5)), Some(Scalar::Int(5)));
    assert_eq!(Scalar::from_json(&serde_json::json!(1.5)), Some(Scalar::Float(1.5)));
    assert_eq!(
      Scalar::from_json(&serde_json::json!("Team01")),
      Some(Scalar::Str("Team01".to_string()))
    );
    assert_eq!(Scalar::from_json(&serde_json::json!([1, 2])), None);
  }

  #[test]
  fn test_timestamp_strings_become_timestamps() {
    let scalar = Scalar::from_json(&serde_json::json!("2026-08-06T12:00:00Z")).unwrap();
    assert!(matches!(scalar, Scalar::Timestamp(_)));
  }

  #[test]
  fn test_row_from_bare_scalar_uses_synthetic_column() {
    let row = row_from_json(&serde_json::json!(5));
    assert_eq!(row.get("$1"), Some(&Scalar::Int(5)));
  }

  #[test]
  fn test_scalar_sum_normalization() {
    assert_eq!(scalar_sum(&[]), None);
    assert_eq!(scalar_sum(&[Row::from([("$1".to_string(), Scalar::Null)])]), None);
    assert_eq!(scalar_sum(&[Row::from([("$1".to_string(), Scalar::Int(5))])]), Some(5));
  }

  #[test]
  fn test_typed_query_lowers_to_parameterized_statement() {
    let query = TypedQuery::new()
      .filter(Filter::eq("teamId", "Team01"))
      .sum("count")
      .to_raw();
    assert_eq!(query.text, "SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = @p0");
    assert_eq!(query.parameters.len(), 1);
    assert_eq!(query.parameters[0].name, "@p0");
    assert_eq!(query.parameters[0].value, Scalar::Str("Team01".to_string()));
  }

  #[test]
  fn test_unfiltered_aggregate_lowers_without_where() {
    let query = TypedQuery::new().sum("count").to_raw();
    assert_eq!(query.text, "SELECT VALUE SUM(c.count) FROM c");
    assert!(query.parameters.is_empty());
  }
}
