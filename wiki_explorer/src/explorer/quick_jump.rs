//! Quick jump palette entries.

use serde::{Deserialize, Serialize};

use wiki_graph::{is_blank, same_topic, ViewedTopics};

/// An entry of the quick jump palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpTarget {
    /// Start a new exploration for the query.
    Search(String),
    /// Jump to an already viewed topic.
    Topic(String),
}

/// Palette entries for a query.
///
/// Viewed topics containing the query (case-insensitively) come most recent
/// first. A non-blank query that is not itself a viewed topic is offered as a
/// new search in front of them.
pub fn quick_jump(viewed: &ViewedTopics, query: &str) -> Vec<JumpTarget> {
    let needle = query.trim().to_lowercase();
    let mut results = Vec::new();

    if !is_blank(query) && !viewed.iter().any(|topic| same_topic(topic, query)) {
        results.push(JumpTarget::Search(query.trim().to_string()));
    }

    results.extend(
        viewed
            .recent_first()
            .filter(|topic| topic.to_lowercase().contains(&needle))
            .map(|topic| JumpTarget::Topic(topic.to_string())),
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewed(topics: &[&str]) -> ViewedTopics {
        ViewedTopics::from(topics.iter().map(|t| t.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_empty_query_lists_everything_recent_first() {
        let results = quick_jump(&viewed(&["Sun", "Earth", "Moon"]), "");
        assert_eq!(
            results,
            vec![
                JumpTarget::Topic("Moon".into()),
                JumpTarget::Topic("Earth".into()),
                JumpTarget::Topic("Sun".into()),
            ]
        );
    }

    #[test]
    fn test_new_query_offers_search_first() {
        let results = quick_jump(&viewed(&["Solar System", "Sun"]), "sol");
        assert_eq!(
            results,
            vec![
                JumpTarget::Search("sol".into()),
                JumpTarget::Topic("Solar System".into()),
            ]
        );
    }

    #[test]
    fn test_exact_viewed_topic_has_no_search_entry() {
        let results = quick_jump(&viewed(&["Sun", "Sunflower"]), " SUN ");
        assert_eq!(
            results,
            vec![
                JumpTarget::Topic("Sunflower".into()),
                JumpTarget::Topic("Sun".into()),
            ]
        );
    }
}
