//! Exploration queue - articles requested in the background.

use serde::{Deserialize, Serialize};

use wiki_graph::{normalize, TopicKey};

/// Lifecycle of a background article request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    Pending,
    Ready,
    /// The generator failed; holds the reason.
    Failed(String),
}

/// One queued topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationTask {
    pub topic: String,
    pub status: FetchStatus,
}

/// Insertion-ordered background requests, at most one per topic.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<ExplorationTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a topic. Returns `false` if it is already queued.
    pub fn push(&mut self, topic: &str, status: FetchStatus) -> bool {
        if self.contains(topic) {
            return false;
        }
        self.tasks.push(ExplorationTask {
            topic: topic.to_string(),
            status,
        });
        true
    }

    pub fn get(&self, topic: &str) -> Option<&ExplorationTask> {
        let key = normalize(topic);
        self.tasks.iter().find(|task| normalize(&task.topic) == key)
    }

    pub fn status(&self, topic: &str) -> Option<&FetchStatus> {
        self.get(topic).map(|task| &task.status)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.get(topic).is_some()
    }

    /// Update the status of the task for `key`. Returns `false` if none is queued.
    pub fn mark(&mut self, key: &TopicKey, status: FetchStatus) -> bool {
        match self.tasks.iter_mut().find(|task| &normalize(&task.topic) == key) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Drop the task for a topic. Returns `false` if none is queued.
    pub fn remove(&mut self, topic: &str) -> bool {
        let key = normalize(topic);
        let before = self.tasks.len();
        self.tasks.retain(|task| normalize(&task.topic) != key);
        self.tasks.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplorationTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_task_per_topic() {
        let mut queue = TaskQueue::new();
        assert!(queue.push("Mars", FetchStatus::Pending));
        assert!(!queue.push("MARS", FetchStatus::Pending));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_mark_and_remove() {
        let mut queue = TaskQueue::new();
        queue.push("Mars", FetchStatus::Pending);

        assert!(queue.mark(&normalize("mars"), FetchStatus::Ready));
        assert_eq!(queue.status("Mars"), Some(&FetchStatus::Ready));
        assert!(!queue.mark(&normalize("venus"), FetchStatus::Ready));

        assert!(queue.remove("mars"));
        assert!(!queue.remove("mars"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let mut queue = TaskQueue::new();
        queue.push("B", FetchStatus::Pending);
        queue.push("A", FetchStatus::Failed("boom".into()));

        let topics: Vec<_> = queue.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(topics, vec!["B", "A"]);
    }
}
