//! Explorer configuration, loaded from TOML.
//!
//! ```toml
//! fetch_timeout_ms = 30000
//! storage_namespace = "infinite-wiki"
//! frame_interval_ms = 16
//!
//! [layout]
//! iterations = 150
//! damping = 0.95
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use wiki_graph::LayoutConfig;

use crate::error::ConfigError;

/// Runtime configuration of an [`Explorer`](crate::explorer::Explorer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// How long a single generator request may take.
    pub fetch_timeout_ms: u64,

    /// Prefix of every persistence key.
    pub storage_namespace: String,

    /// Delay between two layout animation frames.
    pub frame_interval_ms: u64,

    /// Force-directed layout constants.
    pub layout: LayoutConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30_000,
            storage_namespace: "infinite-wiki".to_string(),
            frame_interval_ms: 16,
            layout: LayoutConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("fetch_timeout_ms must be positive".into()));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid("frame_interval_ms must be positive".into()));
        }
        if self.storage_namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_namespace must not be blank".into()));
        }
        self.layout.validate()?;
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Set the generator timeout, rounded down to whole milliseconds but
    /// never below one.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    /// Set the persistence namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ExplorerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_layout_section() {
        let config = ExplorerConfig::from_toml_str(
            r#"
            fetch_timeout_ms = 5000
            storage_namespace = "wiki-test"

            [layout]
            iterations = 300
            damping = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch_timeout_ms, 5000);
        assert_eq!(config.storage_namespace, "wiki-test");
        assert_eq!(config.layout.iterations, 300);
        assert!((config.layout.damping - 0.9).abs() < 1e-9);
        assert_eq!(config.layout.width, LayoutConfig::default().width);
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let result = ExplorerConfig::from_toml_str("[layout]\ndamping = 1.5\n");
        assert!(matches!(result, Err(ConfigError::Layout(_))));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ExplorerConfig::from_toml_str("fetch_timeout_ms = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_sub_millisecond_timeout_stays_positive() {
        let config = ExplorerConfig::default().with_fetch_timeout(Duration::from_micros(300));
        assert_eq!(config.fetch_timeout(), Duration::from_millis(1));
        assert!(config.validate().is_ok());

        let config = ExplorerConfig::default().with_fetch_timeout(Duration::MAX);
        assert_eq!(config.fetch_timeout_ms, u64::MAX);
    }

    #[test]
    fn test_malformed_toml() {
        let result = ExplorerConfig::from_toml_str("fetch_timeout_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.toml");
        std::fs::write(&path, "frame_interval_ms = 33\n").unwrap();

        let config = ExplorerConfig::from_file(&path).unwrap();
        assert_eq!(config.frame_interval(), Duration::from_millis(33));

        assert!(matches!(
            ExplorerConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
