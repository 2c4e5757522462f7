//! Hover highlighting. Pure derived state with no effect on the physics.

use std::collections::HashSet;

use super::GraphEdge;
use crate::topic::TopicKey;

/// The hovered node plus every node one edge away, in either direction.
pub fn connected_nodes(edges: &[GraphEdge], hovered: &TopicKey) -> HashSet<TopicKey> {
    let mut connected = HashSet::new();
    connected.insert(hovered.clone());
    for edge in edges {
        if &edge.source == hovered {
            connected.insert(edge.target.clone());
        } else if &edge.target == hovered {
            connected.insert(edge.source.clone());
        }
    }
    connected
}

/// Which nodes and edges a renderer should dim.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    hovered: Option<TopicKey>,
    connected: HashSet<TopicKey>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the hovered node against the current edges. `None` clears the highlight.
    pub fn set_hover(&mut self, hovered: Option<TopicKey>, edges: &[GraphEdge]) {
        self.connected = match &hovered {
            Some(key) => connected_nodes(edges, key),
            None => HashSet::new(),
        };
        self.hovered = hovered;
    }

    pub fn hovered(&self) -> Option<&TopicKey> {
        self.hovered.as_ref()
    }

    /// Nodes in the highlighted neighbourhood (empty when nothing is hovered).
    pub fn connected(&self) -> &HashSet<TopicKey> {
        &self.connected
    }

    pub fn is_active(&self) -> bool {
        self.hovered.is_some()
    }

    /// A node is dimmed while something else is hovered and it is not adjacent.
    pub fn is_dimmed(&self, key: &TopicKey) -> bool {
        self.is_active() && !self.connected.contains(key)
    }

    /// An edge stays lit only if it touches the hovered node.
    pub fn is_edge_dimmed(&self, edge: &GraphEdge) -> bool {
        match &self.hovered {
            Some(hovered) => &edge.source != hovered && &edge.target != hovered,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::normalize;

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: normalize(source),
            target: normalize(target),
        }
    }

    #[test]
    fn test_connected_includes_both_directions() {
        let edges = vec![edge("A", "B"), edge("C", "A"), edge("B", "D")];
        let connected = connected_nodes(&edges, &normalize("a"));

        assert_eq!(connected.len(), 3);
        assert!(connected.contains(&normalize("A")));
        assert!(connected.contains(&normalize("B")));
        assert!(connected.contains(&normalize("C")));
        assert!(!connected.contains(&normalize("D")));
    }

    #[test]
    fn test_isolated_node_is_connected_to_itself() {
        let connected = connected_nodes(&[], &normalize("Lonely"));
        assert_eq!(connected.len(), 1);
    }

    #[test]
    fn test_hover_state_dimming() {
        let edges = vec![edge("A", "B"), edge("B", "C")];
        let mut hover = HoverState::new();

        assert!(!hover.is_dimmed(&normalize("C")));

        hover.set_hover(Some(normalize("A")), &edges);
        assert!(!hover.is_dimmed(&normalize("A")));
        assert!(!hover.is_dimmed(&normalize("B")));
        assert!(hover.is_dimmed(&normalize("C")));
        assert!(!hover.is_edge_dimmed(&edges[0]));
        assert!(hover.is_edge_dimmed(&edges[1]));

        hover.set_hover(None, &edges);
        assert!(!hover.is_active());
        assert!(!hover.is_dimmed(&normalize("C")));
    }

    #[test]
    fn test_same_hover_follows_new_edges() {
        let mut hover = HoverState::new();
        hover.set_hover(Some(normalize("A")), &[edge("A", "B")]);
        assert!(hover.is_dimmed(&normalize("C")));

        hover.set_hover(Some(normalize("A")), &[edge("A", "C")]);
        assert!(!hover.is_dimmed(&normalize("C")));
        assert!(hover.is_dimmed(&normalize("B")));
    }
}
