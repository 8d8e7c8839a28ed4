use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`DocumentStore`](crate::DocumentStore) implementations.
///
/// `NotFound` and `Conflict` are discriminated so callers can pattern-match
/// recovery instead of inspecting status codes.
#[derive(Error, Debug)]
pub enum StoreError {
  #[error("not found: {0}")]
  NotFound(String),
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),
  #[error("store API error ({status}): {message}")]
  Api { status: u16, message: String },
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("invalid query: {0}")]
  InvalidQuery(String),
  #[error("invalid document: {0}")]
  InvalidDocument(String),
}
