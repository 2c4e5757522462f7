//! Knowledge graph layout.
//!
//! The explored topics form a directed graph: one node per viewed topic and
//! an edge `source -> target` whenever `target` is linked from the article of
//! `source` and has itself been viewed. [`ForceLayout`] positions that graph
//! on a 2D canvas with a bounded physics simulation:
//!
//! 1. **Seed**: Place every node at a seeded random position around the center
//! 2. **Repel**: Push every pair of nodes apart (`repulsion / distance²`)
//! 3. **Attract**: Pull the endpoints of every edge together (spring)
//! 4. **Center**: Pull every node toward the canvas center
//! 5. **Integrate**: `velocity = (velocity + force) * damping`, `position += velocity`
//! 6. **Settle**: Stop after a fixed number of steps
//!
//! Any change of the topic set or edge set restarts from step 1.

mod config;
mod hover;
mod simulation;

pub use config::*;
pub use hover::*;
pub use simulation::*;

use serde::{Deserialize, Serialize};

use crate::store::ArticleStore;
use crate::topic::{normalize, History, TopicKey, ViewedTopics};

/// Node palette; nodes are colored by `color_index % NODE_COLORS.len()`.
pub const NODE_COLORS: &[&str] = &[
    "#22d3ee", "#a78bfa", "#f87171", "#4ade80", "#fbbf24", "#60a5fa",
];

/// A topic to be placed in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    /// Display text (first-seen casing).
    pub id: String,
    pub key: TopicKey,
    pub color_index: usize,
}

impl TopicNode {
    /// Color from [`NODE_COLORS`].
    pub fn color(&self) -> &'static str {
        NODE_COLORS[self.color_index % NODE_COLORS.len()]
    }
}

/// A directed link between two viewed topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: TopicKey,
    pub target: TopicKey,
}

/// The input of a layout run: viewed topics and the links between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<TopicNode>,
    pub edges: Vec<GraphEdge>,
    /// The current topic, for renderers that emphasise it.
    pub current: Option<TopicKey>,
}

impl GraphData {
    /// Derive the graph from the session state.
    ///
    /// Nodes follow the viewed order. Edges keep the order of each source's
    /// link list; links to unviewed topics and self-links are dropped.
    pub fn derive(viewed: &ViewedTopics, store: &ArticleStore, history: &History) -> Self {
        let nodes: Vec<TopicNode> = viewed
            .iter()
            .enumerate()
            .map(|(i, topic)| TopicNode {
                id: topic.to_string(),
                key: normalize(topic),
                color_index: i % NODE_COLORS.len(),
            })
            .collect();

        let mut edges = Vec::new();
        for node in &nodes {
            let Some(links) = store.links_by_key(&node.key) else {
                continue;
            };
            for link in links {
                let target = normalize(link);
                if target == node.key || !viewed.contains_key(&target) {
                    continue;
                }
                edges.push(GraphEdge {
                    source: node.key.clone(),
                    target,
                });
            }
        }

        Self {
            nodes,
            edges,
            current: history.current().map(normalize),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Topics connected to `hovered` (see [`connected_nodes`]).
    pub fn connected_to(&self, hovered: &TopicKey) -> std::collections::HashSet<TopicKey> {
        connected_nodes(&self.edges, hovered)
    }
}

/// Run a complete layout synchronously and return the settled positions.
pub fn compute_layout(graph: &GraphData, config: LayoutConfig, seed: u64) -> LayoutSnapshot {
    let mut layout = ForceLayout::new(config);
    layout.start(graph, seed);
    layout.run();
    layout.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (ViewedTopics, ArticleStore, History) {
        let mut viewed = ViewedTopics::new();
        let mut store = ArticleStore::new();
        let mut history = History::new();

        viewed.insert("Sun");
        viewed.insert("Earth");
        viewed.insert("Moon");
        store.insert("Sun", "The [[Sun]] lights [[Earth]] and [[Jupiter]].");
        store.insert("Earth", "[[Moon]] circles [[sun]].");
        history.push("Sun");
        history.push("Earth");

        (viewed, store, history)
    }

    #[test]
    fn test_derive_nodes_follow_viewed_order() {
        let (viewed, store, history) = session();
        let graph = GraphData::derive(&viewed, &store, &history);

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Sun", "Earth", "Moon"]);
        assert_eq!(graph.nodes[1].color_index, 1);
        assert_eq!(graph.current, Some(normalize("earth")));
    }

    #[test]
    fn test_derive_edges_only_between_viewed_topics() {
        let (viewed, store, history) = session();
        let graph = GraphData::derive(&viewed, &store, &history);

        let edges: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        // Sun -> Sun is a self-link, Jupiter was never viewed, Moon has no article.
        assert_eq!(
            edges,
            vec![("sun", "earth"), ("earth", "moon"), ("earth", "sun")]
        );
    }

    #[test]
    fn test_derive_empty_session() {
        let graph = GraphData::derive(&ViewedTopics::new(), &ArticleStore::new(), &History::new());
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.current, None);
    }

    #[test]
    fn test_colors_cycle() {
        let node = TopicNode {
            id: "X".into(),
            key: normalize("X"),
            color_index: NODE_COLORS.len() + 2,
        };
        assert_eq!(node.color(), NODE_COLORS[2]);
    }

    #[test]
    fn test_compute_layout_empty_graph() {
        let snapshot = compute_layout(&GraphData::default(), LayoutConfig::default(), 7);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.edges.is_empty());
        assert_eq!(snapshot.steps, 0);
        assert!(snapshot.is_settled());
    }
}
