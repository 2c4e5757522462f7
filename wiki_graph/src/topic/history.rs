//! The navigation trail (breadcrumbs). Its last entry is the current topic.

use serde::{Deserialize, Serialize};

use super::normalize;

/// Ordered sequence of topics representing the current navigation path.
///
/// Duplicates are allowed: a user may come back to the same topic further
/// down the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trail from already-recorded topics (e.g. a persisted session).
    pub fn from_topics(topics: Vec<String>) -> Self {
        Self { entries: topics }
    }

    /// The current topic, if any.
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole trail with a single topic.
    pub fn reset_to(&mut self, topic: impl Into<String>) {
        self.entries.clear();
        self.entries.push(topic.into());
    }

    /// Append a topic to the end of the trail.
    pub fn push(&mut self, topic: impl Into<String>) {
        self.entries.push(topic.into());
    }

    /// Keep entries `0..=index` and discard the rest.
    ///
    /// Returns `false` (and leaves the trail untouched) when `index` is out of range.
    pub fn truncate_to(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.truncate(index + 1);
        true
    }

    /// Index of the first entry naming the same topic.
    pub fn position(&self, topic: &str) -> Option<usize> {
        let key = normalize(topic);
        self.entries.iter().position(|entry| normalize(entry) == key)
    }

    /// Check whether the topic appears anywhere on the trail.
    pub fn contains(&self, topic: &str) -> bool {
        self.position(topic).is_some()
    }

    /// Remove every entry naming the same topic. Returns how many were removed.
    pub fn remove_topic(&mut self, topic: &str) -> usize {
        let key = normalize(topic);
        let before = self.entries.len();
        self.entries.retain(|entry| normalize(entry) != key);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
