//! # Configuration Management Module
//!
//! Settings are read from a TOML file (default `gameshelf.toml`). Every
//! section and field has a default, so a missing or partial file still yields
//! a usable configuration.
//!
//! ## Configuration Structure
//!
//! - [`CatalogConfig`] - seeding, import policy and import size limit
//! - [`StorageConfig`] - backend selection and data directory
//! - [`ExportConfig`] - default export file and byte-order mark
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gameshelf::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("gameshelf.toml").await?;
//!     println!("Data directory: {}", config.storage.data_dir);
//!
//!     Config::create_default("gameshelf.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [catalog]
//! seed_examples = true
//! import_policy = "lenient"    # or "strict"
//! max_import_bytes = 16777216
//!
//! [storage]
//! backend = "sled"             # or "json"
//! data_dir = "./data"
//!
//! [export]
//! file = "my-games.json"
//! byte_order_mark = true
//!
//! [logging]
//! level = "info"
//! file = "gameshelf.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::catalog::ImportPolicy;
use crate::storage::StorageBackend;

pub const DEFAULT_CONFIG_PATH: &str = "gameshelf.toml";

/// Embedded images make exports large; 16 MiB leaves room for a few hundred.
const DEFAULT_MAX_IMPORT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Write the example games when the owned collection is missing or empty.
    #[serde(default = "default_true")]
    pub seed_examples: bool,
    /// What an import does with a key that is present but not a list.
    #[serde(default)]
    pub import_policy: ImportPolicy,
    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_examples: true,
            import_policy: ImportPolicy::default(),
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Target of `export` when no path is given.
    #[serde(default = "default_export_file")]
    pub file: String,
    /// Prefix exports with U+FEFF so spreadsheet tools detect UTF-8.
    #[serde(default = "default_true")]
    pub byte_order_mark: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file: default_export_file(),
            byte_order_mark: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("gameshelf.log".to_string()),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_import_bytes() -> usize {
    DEFAULT_MAX_IMPORT_BYTES
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_export_file() -> String {
    "my-games.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path).await
        } else {
            Ok(Config::default())
        }
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values that would make the catalog unusable.
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.catalog.max_import_bytes == 0 {
            return Err(anyhow!("catalog.max_import_bytes must be greater than zero"));
        }
        if self.export.file.trim().is_empty() {
            return Err(anyhow!("export.file must not be empty"));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(anyhow!(
                "logging.level '{}' is not one of off, error, warn, info, debug, trace",
                self.logging.level
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.catalog.seed_examples);
        assert_eq!(config.catalog.import_policy, ImportPolicy::Lenient);
        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert_eq!(config.export.file, "my-games.json");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "json"

            [catalog]
            import_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.catalog.import_policy, ImportPolicy::Strict);
        assert!(config.catalog.seed_examples);
        assert!(config.export.byte_order_mark);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.data_dir = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.max_import_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.storage.data_dir, "./data");
        assert_eq!(parsed.logging.file.as_deref(), Some("gameshelf.log"));
    }

    #[tokio::test]
    async fn test_create_default_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gameshelf.toml");
        let path = path.to_str().unwrap();
        Config::create_default(path).await.unwrap();
        let config = Config::load(path).await.unwrap();
        assert_eq!(config.catalog.max_import_bytes, DEFAULT_MAX_IMPORT_BYTES);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load_or_default(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.export.file, "my-games.json");
    }
}
