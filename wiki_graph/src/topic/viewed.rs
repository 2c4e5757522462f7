//! The set of every topic made current during a session.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{normalize, TopicKey};

/// Insertion-ordered, case-insensitively deduplicated set of topics.
///
/// The first occurrence wins and keeps its original casing. Only grows;
/// entries are never reordered or removed individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ViewedTopics {
    topics: Vec<String>,
    keys: HashSet<TopicKey>,
}

impl ViewedTopics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a topic. Returns `true` if it was not seen before.
    pub fn insert(&mut self, topic: &str) -> bool {
        let key = normalize(topic);
        if key.is_empty() || !self.keys.insert(key) {
            return false;
        }
        self.topics.push(topic.to_string());
        true
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.keys.contains(&normalize(topic))
    }

    pub fn contains_key(&self, key: &TopicKey) -> bool {
        self.keys.contains(key)
    }

    /// Display text recorded for a key.
    pub fn display_name(&self, key: &TopicKey) -> Option<&str> {
        self.topics
            .iter()
            .find(|topic| &normalize(topic) == key)
            .map(String::as_str)
    }

    /// Topics in the order they were first viewed.
    pub fn as_slice(&self) -> &[String] {
        &self.topics
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    /// Topics with the most recently first-viewed one first.
    pub fn recent_first(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn clear(&mut self) {
        self.topics.clear();
        self.keys.clear();
    }
}

impl From<Vec<String>> for ViewedTopics {
    fn from(topics: Vec<String>) -> Self {
        let mut viewed = Self::new();
        for topic in &topics {
            viewed.insert(topic);
        }
        viewed
    }
}

impl From<ViewedTopics> for Vec<String> {
    fn from(viewed: ViewedTopics) -> Self {
        viewed.topics
    }
}

impl PartialEq for ViewedTopics {
    fn eq(&self, other: &Self) -> bool {
        self.topics == other.topics
    }
}

impl Eq for ViewedTopics {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_casing_wins() {
        let mut viewed = ViewedTopics::new();
        assert!(viewed.insert("Solar System"));
        assert!(!viewed.insert("solar system"));
        assert!(!viewed.insert("  SOLAR SYSTEM "));

        assert_eq!(viewed.len(), 1);
        assert_eq!(viewed.as_slice(), &["Solar System".to_string()]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut viewed = ViewedTopics::new();
        viewed.insert("B");
        viewed.insert("A");
        viewed.insert("C");
        viewed.insert("a");

        let order: Vec<_> = viewed.iter().collect();
        assert_eq!(order, vec!["B", "A", "C"]);

        let recent: Vec<_> = viewed.recent_first().collect();
        assert_eq!(recent, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_blank_topics_are_ignored() {
        let mut viewed = ViewedTopics::new();
        assert!(!viewed.insert("   "));
        assert!(viewed.is_empty());
    }

    #[test]
    fn test_display_name_lookup() {
        let mut viewed = ViewedTopics::new();
        viewed.insert("Black Hole");
        assert_eq!(viewed.display_name(&normalize("black hole")), Some("Black Hole"));
        assert_eq!(viewed.display_name(&normalize("quasar")), None);
    }

    #[test]
    fn test_serde_round_trip_dedups() {
        let json = r#"["Mars","mars","Venus"]"#;
        let viewed: ViewedTopics = serde_json::from_str(json).unwrap();
        assert_eq!(viewed.len(), 2);
        assert!(viewed.contains("MARS"));

        let out = serde_json::to_string(&viewed).unwrap();
        assert_eq!(out, r#"["Mars","Venus"]"#);
    }
}
