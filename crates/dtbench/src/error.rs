use thiserror::Error;

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Error, Debug)]
pub enum BenchError {
  #[error("store error: {0}")]
  Store(#[from] docstore::StoreError),
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("TOML parse error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}
