use fahrtenbuch_auth::AccessConfig;
use fahrtenbuch_db_memory::{StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub blob: BlobConfig,
    /// Onboarding and trip limits
    #[serde(default)]
    pub access: AccessConfig,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }
        if self.blob.base_url.trim().is_empty() {
            return Err("blob.base_url must not be empty".into());
        }
        self.access.validate()?;
        Ok(())
    }

    /// Settings handed to the storage factory.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            backend: self.storage.backend,
            blob_base_url: self.blob.base_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Prefix of issued upload and download URLs
    #[serde(default = "default_blob_base_url")]
    pub base_url: String,
}
fn default_blob_base_url() -> String {
    "memory://blobs".into()
}
impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: default_blob_base_url(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default configuration file, looked up relative to the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "fahrtenbuch.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let file = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if file.exists() {
            builder = builder.add_source(File::from(file));
        } else if path.is_some() {
            tracing::warn!(path = %file.display(), "config file not found; using defaults");
        }
        // Environment variable overrides, e.g., FAHRTENBUCH__ACCESS__MAX_TRIP_KM=1500
        builder = builder.add_source(
            Environment::with_prefix("FAHRTENBUCH")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
