//! Topics and their identity.
//!
//! A topic is a human-readable string such as "Solar System". Two topics are
//! the same entity iff their [`TopicKey`]s are equal; the display text always
//! keeps the casing it was first seen with.

mod history;
mod viewed;

pub use history::*;
pub use viewed::*;

use serde::{Deserialize, Serialize};

/// Case-insensitive lookup key for a topic: `lowercase(trim(topic))`.
///
/// Used as the map key everywhere, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicKey(String);

impl TopicKey {
    /// Normalize a topic into its key.
    pub fn new(topic: &str) -> Self {
        Self(topic.trim().to_lowercase())
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the topic this key was built from was blank.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for TopicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TopicKey {
    fn from(topic: &str) -> Self {
        Self::new(topic)
    }
}

/// Canonicalize a topic string into its case-insensitive lookup key.
///
/// Every identity comparison between topics goes through this function.
pub fn normalize(topic: &str) -> TopicKey {
    TopicKey::new(topic)
}

/// Check whether two topic strings name the same entity.
pub fn same_topic(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Check whether a topic is blank (empty or whitespace-only).
pub fn is_blank(topic: &str) -> bool {
    topic.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ignores_case_and_whitespace() {
        assert_eq!(normalize("Solar System"), normalize("  solar SYSTEM\t"));
        assert_eq!(normalize("Paris").as_str(), "paris");
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_ne!(normalize("Solar System"), normalize("SolarSystem"));
    }

    #[test]
    fn test_blank_topics() {
        assert!(is_blank(""));
        assert!(is_blank("   \n"));
        assert!(!is_blank(" x "));
        assert!(normalize("  ").is_empty());
    }

    #[test]
    fn test_same_topic() {
        assert!(same_topic("Mars", "mars "));
        assert!(!same_topic("Mars", "Venus"));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let key = normalize("Black Hole");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"black hole\"");

        let back: TopicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
