//! JSON-over-HTTP [`DocumentStore`] client.
//!
//! Resource layout: `{endpoint}/dbs/{database}/colls[/{collection}[/docs|/query]]`.
//! The access key travels as a bearer credential and the partition key for an
//! insert as the `x-partition-key` header. HTTP 404 and 409 map onto the
//! `NotFound` / `Conflict` variants; every other non-success status surfaces
//! as an API error carrying the response body.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  error::{Result, StoreError},
  store::DocumentStore,
  types::{
    AggregateQuery, CollectionInfo, CollectionSpec, CreateOptions, Param, RawQuery, Row, row_from_json, scalar_sum,
  },
};

const PARTITION_KEY_HEADER: &str = "x-partition-key";

#[derive(Debug, Clone)]
pub struct RestStore {
  http: reqwest::Client,
  endpoint: String,
  access_key: String,
  database: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
  id: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  partition_key_path: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  throughput_units: Option<u32>,
}

#[derive(Serialize)]
struct QueryBody<'a> {
  query: &'a str,
  parameters: &'a [Param],
}

#[derive(Deserialize)]
struct QueryResponse {
  #[serde(default)]
  rows: Vec<serde_json::Value>,
}

impl RestStore {
  pub fn new(endpoint: &str, access_key: &str, database: &str) -> Result<Self> {
    let http = reqwest::Client::builder().build()?;
    Ok(Self {
      http,
      endpoint: endpoint.trim_end_matches('/').to_string(),
      access_key: access_key.to_string(),
      database: database.to_string(),
    })
  }

  fn collections_url(&self) -> String {
    format!("{}/dbs/{}/colls", self.endpoint, self.database)
  }

  fn collection_url(&self, name: &str) -> String {
    format!("{}/{}", self.collections_url(), name)
  }

  fn docs_url(&self, name: &str) -> String {
    format!("{}/docs", self.collection_url(name))
  }

  fn query_url(&self, name: &str) -> String {
    format!("{}/query", self.collection_url(name))
  }

  /// Map a non-success response onto the store error taxonomy.
  async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(if status == StatusCode::NOT_FOUND {
      StoreError::NotFound(context.to_string())
    } else if status == StatusCode::CONFLICT {
      StoreError::Conflict(context.to_string())
    } else {
      StoreError::Api {
        status: status.as_u16(),
        message,
      }
    })
  }
}

#[async_trait::async_trait]
impl DocumentStore for RestStore {
  #[tracing::instrument(level = "trace", skip(self))]
  async fn delete_collection(&self, name: &str) -> Result<()> {
    let response = self
      .http
      .delete(self.collection_url(name))
      .bearer_auth(&self.access_key)
      .send()
      .await?;
    Self::check(response, name).await?;
    debug!(collection = name, "collection deleted");
    Ok(())
  }

  #[tracing::instrument(level = "trace", skip(self, options), fields(collection = %spec.id))]
  async fn create_collection_if_not_exists(
    &self,
    spec: CollectionSpec,
    options: CreateOptions,
  ) -> Result<CollectionInfo> {
    let body = CreateBody {
      id: &spec.id,
      partition_key_path: spec.partition_key_path.as_deref(),
      throughput_units: options.throughput_units,
    };
    let response = self
      .http
      .post(self.collections_url())
      .bearer_auth(&self.access_key)
      .json(&body)
      .send()
      .await?;
    let response = Self::check(response, &spec.id).await?;
    Ok(response.json::<CollectionInfo>().await?)
  }

  async fn insert(&self, collection: &str, partition_key: &str, document: &serde_json::Value) -> Result<()> {
    let response = self
      .http
      .post(self.docs_url(collection))
      .bearer_auth(&self.access_key)
      .header(PARTITION_KEY_HEADER, partition_key)
      .json(document)
      .send()
      .await?;
    Self::check(response, collection).await?;
    Ok(())
  }

  async fn query_raw(&self, collection: &str, query: &RawQuery) -> Result<Vec<Row>> {
    let body = QueryBody {
      query: &query.text,
      parameters: &query.parameters,
    };
    let response = self
      .http
      .post(self.query_url(collection))
      .bearer_auth(&self.access_key)
      .json(&body)
      .send()
      .await?;
    let response = Self::check(response, collection).await?;
    let payload: QueryResponse = response.json().await?;
    debug!(collection, rows = payload.rows.len(), "raw query materialized");
    Ok(payload.rows.iter().map(row_from_json).collect())
  }

  async fn query_aggregate(&self, collection: &str, query: &AggregateQuery) -> Result<Option<i64>> {
    // Structured queries lower to the wire statement client-side
    let raw = query.to_raw();
    let rows = self.query_raw(collection, &raw).await?;
    Ok(scalar_sum(&rows))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> RestStore {
    RestStore::new("https://store.example:8081/", "key", "downtime").unwrap()
  }

  #[test]
  fn test_resource_urls() {
    let store = store();
    assert_eq!(store.collections_url(), "https://store.example:8081/dbs/downtime/colls");
    assert_eq!(
      store.collection_url("DowntimeRecords"),
      "https://store.example:8081/dbs/downtime/colls/DowntimeRecords"
    );
    assert_eq!(
      store.docs_url("DowntimeRecords"),
      "https://store.example:8081/dbs/downtime/colls/DowntimeRecords/docs"
    );
    assert_eq!(
      store.query_url("DowntimeRecords"),
      "https://store.example:8081/dbs/downtime/colls/DowntimeRecords/query"
    );
  }

  #[test]
  fn test_create_body_omits_absent_options() {
    let body = CreateBody {
      id: "DowntimeRecords",
      partition_key_path: None,
      throughput_units: None,
    };
    assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"id":"DowntimeRecords"}"#);

    let body = CreateBody {
      id: "DowntimeRecords",
      partition_key_path: Some("/teamId"),
      throughput_units: Some(10000),
    };
    assert_eq!(
      serde_json::to_string(&body).unwrap(),
      r#"{"id":"DowntimeRecords","partitionKeyPath":"/teamId","throughputUnits":10000}"#
    );
  }
}
