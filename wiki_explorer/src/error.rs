//! Error types for the explorer.
//!
//! Only [`NavigationError`] ever crosses a public operation boundary.
//! Generation failures are folded into the single [`ExplorationError`] slot
//! of the session, and persistence failures are logged and swallowed.

use std::time::Duration;

use wiki_graph::LayoutConfigError;

use crate::deep_dive::DeepDiveKind;

/// Failure reported by an [`ArticleGenerator`](crate::generator::ArticleGenerator).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("AI service error: {0}")]
    Service(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Generator does not support {0}")]
    Unsupported(DeepDiveKind),
}

/// The user-facing error of a session. At most one is active at a time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplorationError {
    #[error("Failed to generate an article for \"{topic}\". The topic might be too ambiguous or the service is currently unavailable. Please try again.")]
    FetchFailed { topic: String, reason: String },
    #[error("Generating the article for \"{topic}\" took longer than {timeout:?}. Please try again.")]
    TimedOut { topic: String, timeout: Duration },
    #[error("Failed to generate {kind} for \"{topic}\". Please try again.")]
    DeepDiveFailed {
        topic: String,
        kind: DeepDiveKind,
        reason: String,
    },
}

impl ExplorationError {
    /// Convert a failed article fetch into the user-facing error.
    pub fn article_failed(topic: &str, error: &GenerationError) -> Self {
        match error {
            GenerationError::Timeout(timeout) => ExplorationError::TimedOut {
                topic: topic.to_string(),
                timeout: *timeout,
            },
            other => ExplorationError::FetchFailed {
                topic: topic.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Convert a failed deep dive into the user-facing error.
    pub fn deep_dive_failed(topic: &str, kind: DeepDiveKind, error: &GenerationError) -> Self {
        ExplorationError::DeepDiveFailed {
            topic: topic.to_string(),
            kind,
            reason: error.to_string(),
        }
    }

    /// The topic the failure refers to.
    pub fn topic(&self) -> &str {
        match self {
            ExplorationError::FetchFailed { topic, .. }
            | ExplorationError::TimedOut { topic, .. }
            | ExplorationError::DeepDiveFailed { topic, .. } => topic,
        }
    }
}

/// Precondition violation of a navigation operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("History index {index} is out of range (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure of a [`KeyValueStore`](crate::persistence::KeyValueStore).
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure loading an [`ExplorerConfig`](crate::config::ExplorerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid layout configuration: {0}")]
    Layout(#[from] LayoutConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
