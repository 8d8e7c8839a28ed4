//! Minimal parser for the aggregate statement grammar executed in-process by
//! [`MemoryStore`](crate::MemoryStore).
//!
//! Supported shape:
//!
//! ```text
//! SELECT VALUE SUM(c.<field>) FROM c [WHERE c.<field> = <value>]
//! ```
//!
//! where `<value>` is an `@parameter` reference, a double-quoted string, or
//! an integer literal. Keywords are case-insensitive. Anything outside this
//! shape is rejected as `InvalidQuery` rather than silently misread.

use crate::{
  error::{Result, StoreError},
  types::{RawQuery, Scalar},
};

/// A parsed filter value: bound at execution time or inline in the text.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueRef {
  Parameter(String),
  Literal(Scalar),
}

/// A parsed `SELECT VALUE SUM` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SumStatement {
  pub sum_field: String,
  pub filter: Option<(String, ValueRef)>,
}

impl SumStatement {
  pub fn parse(text: &str) -> Result<Self> {
    let rest = eat_keyword(text, "SELECT").ok_or_else(|| invalid(text, "expected SELECT"))?;
    let rest = eat_keyword(rest, "VALUE").ok_or_else(|| invalid(text, "expected VALUE"))?;
    let rest = eat_keyword(rest, "SUM").ok_or_else(|| invalid(text, "expected SUM"))?;
    let rest = rest
      .trim_start()
      .strip_prefix('(')
      .ok_or_else(|| invalid(text, "expected ( after SUM"))?;
    let (sum_field, rest) = parse_field_ref(rest).ok_or_else(|| invalid(text, "expected c.<field> in SUM"))?;
    let rest = rest
      .trim_start()
      .strip_prefix(')')
      .ok_or_else(|| invalid(text, "expected ) after SUM field"))?;
    let rest = eat_keyword(rest, "FROM").ok_or_else(|| invalid(text, "expected FROM"))?;
    let rest = eat_keyword(rest, "c").ok_or_else(|| invalid(text, "expected collection alias c"))?;

    let rest = rest.trim_start();
    let filter = if rest.is_empty() {
      None
    } else {
      let rest = eat_keyword(rest, "WHERE").ok_or_else(|| invalid(text, "expected WHERE or end of statement"))?;
      let (field, rest) = parse_field_ref(rest).ok_or_else(|| invalid(text, "expected c.<field> in WHERE"))?;
      let rest = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| invalid(text, "expected = in WHERE"))?;
      let (value, rest) = parse_value(rest).ok_or_else(|| invalid(text, "expected comparison value"))?;
      if !rest.trim().is_empty() {
        return Err(invalid(text, "trailing input after WHERE clause"));
      }
      Some((field, value))
    };

    Ok(Self { sum_field, filter })
  }

  /// Resolve the filter against the query's bound parameters.
  pub fn resolve(&self, query: &RawQuery) -> Result<Option<(String, Scalar)>> {
    match &self.filter {
      None => Ok(None),
      Some((field, ValueRef::Literal(value))) => Ok(Some((field.clone(), value.clone()))),
      Some((field, ValueRef::Parameter(name))) => {
        let param = query
          .parameters
          .iter()
          .find(|p| p.name == *name)
          .ok_or_else(|| StoreError::InvalidQuery(format!("unbound parameter {name}")))?;
        Ok(Some((field.clone(), param.value.clone())))
      }
    }
  }
}

fn invalid(text: &str, reason: &str) -> StoreError {
  StoreError::InvalidQuery(format!("{reason} in {text:?}"))
}

/// Consume a case-insensitive keyword at a token boundary.
fn eat_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
  let trimmed = input.trim_start();
  if trimmed.len() < keyword.len() || !trimmed.is_char_boundary(keyword.len()) {
    return None;
  }
  let (head, tail) = trimmed.split_at(keyword.len());
  if !head.eq_ignore_ascii_case(keyword) {
    return None;
  }
  match tail.chars().next() {
    Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
    _ => Some(tail),
  }
}

/// Parse a `c.<field>` reference, returning the field name and the rest.
fn parse_field_ref(input: &str) -> Option<(String, &str)> {
  let rest = input.trim_start().strip_prefix("c.")?;
  let end = rest
    .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
    .unwrap_or(rest.len());
  if end == 0 {
    return None;
  }
  Some((rest[..end].to_string(), &rest[end..]))
}

fn parse_value(input: &str) -> Option<(ValueRef, &str)> {
  let rest = input.trim_start();
  if let Some(after) = rest.strip_prefix('@') {
    let end = after
      .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
      .unwrap_or(after.len());
    if end == 0 {
      return None;
    }
    Some((ValueRef::Parameter(format!("@{}", &after[..end])), &after[end..]))
  } else if let Some(after) = rest.strip_prefix('"') {
    let end = after.find('"')?;
    Some((
      ValueRef::Literal(Scalar::Str(after[..end].to_string())),
      &after[end + 1..],
    ))
  } else {
    let end = rest
      .find(|ch: char| !ch.is_ascii_digit() && ch != '-')
      .unwrap_or(rest.len());
    let number = rest[..end].parse::<i64>().ok()?;
    Some((ValueRef::Literal(Scalar::Int(number)), &rest[end..]))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_parameterized_statement() {
    let stmt = SumStatement::parse("SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = @teamId").unwrap();
    assert_eq!(stmt.sum_field, "count");
    assert_eq!(
      stmt.filter,
      Some(("teamId".to_string(), ValueRef::Parameter("@teamId".to_string())))
    );
  }

  #[test]
  fn test_parse_string_literal_filter() {
    let stmt = SumStatement::parse("SELECT VALUE Sum(c.Count) from c Where c.TeamId = \"Team01\"").unwrap();
    assert_eq!(stmt.sum_field, "Count");
    assert_eq!(
      stmt.filter,
      Some((
        "TeamId".to_string(),
        ValueRef::Literal(Scalar::Str("Team01".to_string()))
      ))
    );
  }

  #[test]
  fn test_parse_unfiltered_statement() {
    let stmt = SumStatement::parse("SELECT VALUE SUM(c.count) FROM c").unwrap();
    assert_eq!(stmt.filter, None);
  }

  #[test]
  fn test_rejects_unsupported_statements() {
    assert!(SumStatement::parse("SELECT * FROM c").is_err());
    assert!(SumStatement::parse("SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = ").is_err());
    assert!(SumStatement::parse("SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = @teamId AND 1 = 1").is_err());
  }

  #[test]
  fn test_resolve_unbound_parameter_is_an_error() {
    let stmt = SumStatement::parse("SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = @teamId").unwrap();
    let query = RawQuery::new("SELECT VALUE SUM(c.count) FROM c WHERE c.teamId = @teamId");
    assert!(matches!(stmt.resolve(&query), Err(StoreError::InvalidQuery(_))));
  }
}
