//! Runtime configuration with file and environment resolution.
//!
//! Precedence: explicit path > ./dtbench.toml > user config dir > defaults.
//! `DTBENCH_ENDPOINT`, `DTBENCH_ACCESS_KEY` and `DTBENCH_DATABASE` override
//! file values; access keys belong in the environment, not on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::Result, record::DowntimeRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
  pub store: StoreConfig,
  pub collection: CollectionConfig,
  pub seed: SeedConfig,
}

/// Connection settings for the remote store, resolved once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Store endpoint address
  pub endpoint: String,
  /// Access credential
  pub access_key: String,
  /// Logical database identifier
  pub database: String,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      endpoint: "https://localhost:8081".to_string(),
      access_key: String::new(),
      database: "downtime".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
  /// Collection identifier
  pub name: String,
  /// Partition key path the collection is created on
  pub partition_key_path: String,
  /// Provisioned throughput for partitioned creation
  pub throughput_units: u32,
}

impl Default for CollectionConfig {
  fn default() -> Self {
    Self {
      name: DowntimeRecord::COLLECTION.to_string(),
      partition_key_path: DowntimeRecord::PARTITION_KEY_PATH.to_string(),
      throughput_units: 10000,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  /// Number of partitions a seeding run creates
  pub partitions: usize,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self { partitions: 100 }
  }
}

impl Config {
  /// Load configuration. An explicit path must exist and parse; the default
  /// locations fall through silently to the built-in defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let mut config = match explicit {
      Some(path) => {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)?
      }
      None => Self::load_default_locations(),
    };
    config.apply_env();
    Ok(config)
  }

  fn load_default_locations() -> Self {
    let local = Path::new("dtbench.toml");
    if local.exists()
      && let Ok(content) = std::fs::read_to_string(local)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    if let Some(path) = Self::user_config_path()
      && path.exists()
      && let Ok(content) = std::fs::read_to_string(&path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    Self::default()
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DTBENCH_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("dtbench").join("config.toml"))
  }

  fn apply_env(&mut self) {
    if let Ok(endpoint) = std::env::var("DTBENCH_ENDPOINT") {
      self.store.endpoint = endpoint;
    }
    if let Ok(access_key) = std::env::var("DTBENCH_ACCESS_KEY") {
      self.store.access_key = access_key;
    }
    if let Ok(database) = std::env::var("DTBENCH_DATABASE") {
      self.store.database = database;
    }
  }
}
