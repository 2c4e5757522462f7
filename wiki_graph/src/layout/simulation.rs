//! The force-directed layout stepper.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{connected_nodes, GraphData, GraphEdge, LayoutConfig};
use crate::topic::TopicKey;

/// Identifies one run of the simulation. Strictly increases on every restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Permission to perform the next frame of a specific run.
///
/// A ticket from a superseded or cancelled run is rejected, so a frame loop
/// scheduled for an old input set can never move the nodes of a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: Generation,
}

impl FrameTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Result of [`ForceLayout::step_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A step was performed; schedule another frame with this ticket.
    Continue(FrameTicket),
    /// The iteration budget is exhausted. Stop scheduling.
    Settled,
    /// The ticket belongs to a run that was restarted or cancelled.
    Superseded,
}

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutPhase {
    /// Nothing was started yet.
    #[default]
    Idle,
    /// Positions are seeded, no step taken.
    Seeded,
    Running,
    /// The fixed iteration budget was used up (or there was nothing to lay out).
    Settled,
    Cancelled,
}

/// A node with its position and velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub key: TopicKey,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color_index: usize,
}

/// An edge with the current coordinates of its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePosition {
    pub source: TopicKey,
    pub target: TopicKey,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub generation: Generation,
    pub phase: LayoutPhase,
    /// Steps taken so far in this generation.
    pub steps: u32,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgePosition>,
    pub current: Option<TopicKey>,
}

impl LayoutSnapshot {
    pub fn is_settled(&self) -> bool {
        self.phase == LayoutPhase::Settled
    }

    pub fn node(&self, key: &TopicKey) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.key == key)
    }
}

/// Force-directed layout over a [`GraphData`].
///
/// A free-standing stepper: [`start`](Self::start) seeds a new run,
/// [`step`](Self::step) advances it by one simulation step and
/// [`cancel`](Self::cancel) stops it. Frame-driven callers use
/// [`step_frame`](Self::step_frame) with the ticket returned by `start`.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    config: LayoutConfig,
    nodes: Vec<GraphNode>,
    /// Edges as node indices, parallel to `edge_keys`.
    edges: Vec<(usize, usize)>,
    edge_keys: Vec<GraphEdge>,
    current: Option<TopicKey>,
    steps: u32,
    generation: Generation,
    phase: LayoutPhase,
}

impl ForceLayout {
    /// Create an idle layout with the given constants.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_keys: Vec::new(),
            current: None,
            steps: 0,
            generation: Generation::default(),
            phase: LayoutPhase::Idle,
        }
    }

    /// Create a layout with default constants.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Discard the current run and seed a new one from `graph`.
    ///
    /// Initial positions are drawn from a [`StdRng`] seeded with `seed`, so
    /// identical inputs and seeds produce identical runs. An empty graph is
    /// settled immediately without any steps.
    pub fn start(&mut self, graph: &GraphData, seed: u64) -> FrameTicket {
        self.generation = self.generation.next();
        self.steps = 0;
        self.current = graph.current.clone();

        let mut rng = StdRng::seed_from_u64(seed);
        let (cx, cy) = self.config.center();
        let spread = self.config.initial_spread;

        let mut index: HashMap<&TopicKey, usize> = HashMap::new();
        self.nodes = Vec::with_capacity(graph.nodes.len());
        for topic in &graph.nodes {
            if index.contains_key(&topic.key) {
                continue;
            }
            let (dx, dy) = if spread > 0.0 {
                (rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread))
            } else {
                (0.0, 0.0)
            };
            index.insert(&topic.key, self.nodes.len());
            self.nodes.push(GraphNode {
                id: topic.id.clone(),
                key: topic.key.clone(),
                x: cx + dx,
                y: cy + dy,
                vx: 0.0,
                vy: 0.0,
                color_index: topic.color_index,
            });
        }

        self.edges.clear();
        self.edge_keys.clear();
        for edge in &graph.edges {
            if let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target)) {
                self.edges.push((source, target));
                self.edge_keys.push(edge.clone());
            }
        }

        self.phase = if self.nodes.is_empty() {
            LayoutPhase::Settled
        } else {
            LayoutPhase::Seeded
        };

        tracing::debug!(
            generation = self.generation.0,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            seed,
            "layout restarted"
        );

        FrameTicket {
            generation: self.generation,
        }
    }

    /// Advance the simulation by one step.
    ///
    /// Returns `false` without moving anything unless the run is seeded or running.
    pub fn step(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let forces = self.net_forces();
        let damping = self.config.damping;
        for (node, (fx, fy)) in self.nodes.iter_mut().zip(forces) {
            node.vx = (node.vx + fx) * damping;
            node.vy = (node.vy + fy) * damping;
            node.x += node.vx;
            node.y += node.vy;
        }

        self.steps += 1;
        if self.steps >= self.config.iterations {
            self.phase = LayoutPhase::Settled;
            tracing::debug!(generation = self.generation.0, steps = self.steps, "layout settled");
        } else {
            self.phase = LayoutPhase::Running;
        }
        true
    }

    /// Perform one frame of work for the run identified by `ticket`.
    pub fn step_frame(&mut self, ticket: FrameTicket) -> FrameOutcome {
        if ticket.generation != self.generation || self.phase == LayoutPhase::Cancelled {
            return FrameOutcome::Superseded;
        }
        if !self.is_running() {
            return FrameOutcome::Settled;
        }

        self.step();
        if self.is_running() {
            FrameOutcome::Continue(ticket)
        } else {
            FrameOutcome::Settled
        }
    }

    /// Step until settled. Returns the number of steps taken in this run.
    pub fn run(&mut self) -> u32 {
        while self.step() {}
        self.steps
    }

    /// Stop the current run; outstanding frame tickets become invalid.
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.phase = LayoutPhase::Cancelled;
            tracing::debug!(generation = self.generation.0, steps = self.steps, "layout cancelled");
        }
    }

    /// Move a node by hand (e.g. dragging), dropping its velocity.
    pub fn move_node(&mut self, key: &TopicKey, x: f64, y: f64) -> bool {
        match self.nodes.iter_mut().find(|node| &node.key == key) {
            Some(node) => {
                node.x = x;
                node.y = y;
                node.vx = 0.0;
                node.vy = 0.0;
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, LayoutPhase::Seeded | LayoutPhase::Running)
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edge_keys
    }

    pub fn node(&self, key: &TopicKey) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.key == key)
    }

    /// The hovered node and its direct neighbours.
    pub fn connected_to(&self, hovered: &TopicKey) -> HashSet<TopicKey> {
        connected_nodes(&self.edge_keys, hovered)
    }

    /// Copy the current positions for rendering.
    pub fn snapshot(&self) -> LayoutSnapshot {
        let edges = self
            .edges
            .iter()
            .zip(&self.edge_keys)
            .map(|(&(s, t), keys)| EdgePosition {
                source: keys.source.clone(),
                target: keys.target.clone(),
                x1: self.nodes[s].x,
                y1: self.nodes[s].y,
                x2: self.nodes[t].x,
                y2: self.nodes[t].y,
            })
            .collect();

        LayoutSnapshot {
            generation: self.generation,
            phase: self.phase,
            steps: self.steps,
            nodes: self.nodes.clone(),
            edges,
            current: self.current.clone(),
        }
    }

    /// Net force on every node for the current positions.
    fn net_forces(&self) -> Vec<(f64, f64)> {
        let config = &self.config;
        let mut forces = vec![(0.0, 0.0); self.nodes.len()];

        // Repulsion between every ordered pair; each pair is visited from both
        // sides, so contributions are equal and opposite.
        for (a, node_a) in self.nodes.iter().enumerate() {
            for (b, node_b) in self.nodes.iter().enumerate() {
                if a == b {
                    continue;
                }
                let (dx, dy) = (node_a.x - node_b.x, node_a.y - node_b.y);
                let distance_sq = dx * dx + dy * dy;
                if distance_sq == 0.0 {
                    continue;
                }
                let distance = distance_sq.sqrt();
                let magnitude = (config.repulsion / distance_sq).min(config.max_repulsion);
                forces[a].0 += dx / distance * magnitude;
                forces[a].1 += dy / distance * magnitude;
            }
        }

        // Springs along edges
        for &(source, target) in &self.edges {
            let fx = (self.nodes[target].x - self.nodes[source].x) * config.spring;
            let fy = (self.nodes[target].y - self.nodes[source].y) * config.spring;
            forces[source].0 += fx;
            forces[source].1 += fy;
            forces[target].0 -= fx;
            forces[target].1 -= fy;
        }

        // Centering
        let (cx, cy) = config.center();
        for (force, node) in forces.iter_mut().zip(&self.nodes) {
            force.0 += (cx - node.x) * config.centering;
            force.1 += (cy - node.y) * config.centering;
        }

        forces
    }
}
