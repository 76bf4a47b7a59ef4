//! Configuration schema and loader.
//!
//! Configuration is layered through figment: built-in defaults, then an
//! optional TOML file (with the `toml-config` feature), then environment
//! variables. Later sources override earlier ones.
//!
//! Environment variables use the `SIFT_` prefix with `__` as the section
//! separator: `SIFT_LOGGING__LEVEL=debug` maps to `logging.level = "debug"`.

use std::collections::HashMap;
use std::path::PathBuf;

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the requested path.
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Extraction or parsing failure from any layered source.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiftConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Per-module level overrides, e.g. `sift_framework = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            filters: HashMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads configuration from the default locations: defaults, `sift.toml`
/// in the working directory (when the `toml-config` feature is enabled and
/// the file exists), then `SIFT_*` environment variables.
pub fn load_config() -> ConfigResult<SiftConfig> {
    ConfigLoader::new().load()
}

/// Layered configuration loader.
pub struct ConfigLoader {
    file: Option<PathBuf>,
    with_env: bool,
}

impl ConfigLoader {
    /// A loader using the default file location and environment overrides.
    pub fn new() -> Self {
        Self {
            file: None,
            with_env: true,
        }
    }

    /// Reads the given file instead of the default location. The file must
    /// exist; a missing explicit path is an error, unlike the default one.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Disables the environment variable layer.
    pub fn without_env(mut self) -> Self {
        self.with_env = false;
        self
    }

    /// Extracts the final configuration.
    pub fn load(self) -> ConfigResult<SiftConfig> {
        let mut figment = Figment::from(Serialized::defaults(SiftConfig::default()));

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            figment = self.merge_file(figment, path);
        } else {
            #[cfg(feature = "toml-config")]
            {
                let default_path = PathBuf::from("sift.toml");
                if default_path.exists() {
                    figment = self.merge_file(figment, &default_path);
                }
            }
        }

        if self.with_env {
            figment = figment.merge(Env::prefixed("SIFT_").split("__"));
        }

        let config: SiftConfig = figment.extract()?;
        debug!(level = %config.logging.level, "configuration loaded");
        Ok(config)
    }

    #[cfg(feature = "toml-config")]
    fn merge_file(&self, figment: Figment, path: &std::path::Path) -> Figment {
        debug!(path = %path.display(), "merging configuration file");
        figment.merge(Toml::file(path))
    }

    #[cfg(not(feature = "toml-config"))]
    fn merge_file(&self, figment: Figment, path: &std::path::Path) -> Figment {
        tracing::warn!(
            path = %path.display(),
            "configuration file ignored: no file format feature enabled"
        );
        figment
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SiftConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.filters.is_empty());
    }

    #[test]
    fn deserializes_from_json() {
        let config: SiftConfig = serde_json::from_str(
            r#"{"logging": {"level": "debug", "filters": {"sift_framework": "trace"}}}"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.filters.get("sift_framework").map(String::as_str),
            Some("trace")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigLoader::new()
            .without_env()
            .file("definitely/not/here.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn loads_defaults_without_sources() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
