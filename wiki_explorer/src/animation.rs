//! Frame-paced layout runs.
//!
//! A [`LayoutAnimator`] owns one [`ForceLayout`] on a background task and
//! performs one simulation step per frame. Restarting with new graph data
//! supersedes the running generation; its pending frame is rejected by the
//! stepper and never touches the new nodes.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use wiki_graph::{ForceLayout, FrameOutcome, FrameTicket, GraphData, LayoutConfig, LayoutSnapshot, TopicKey};

use crate::config::ExplorerConfig;

enum Command {
    Restart { graph: GraphData, seed: u64 },
    Move { key: TopicKey, x: f64, y: f64 },
    Cancel,
}

/// Handle to a layout running on a tokio task. Dropping it stops the task.
pub struct LayoutAnimator {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<LayoutSnapshot>,
    task: JoinHandle<()>,
}

impl LayoutAnimator {
    /// Spawn the frame loop. Must be called from within a tokio runtime.
    pub fn spawn(config: LayoutConfig, frame_interval: Duration) -> Self {
        let layout = ForceLayout::new(config);
        let (commands, receiver) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(layout.snapshot());

        let task = tokio::spawn(frame_loop(layout, receiver, publisher, frame_interval));

        Self {
            commands,
            snapshots,
            task,
        }
    }

    /// Spawn with the layout constants and frame pacing of an explorer config.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::spawn(config.layout.clone(), config.frame_interval())
    }

    /// Start a new generation for `graph`. Returns `false` if the loop has stopped.
    pub fn restart(&self, graph: GraphData, seed: u64) -> bool {
        self.commands.send(Command::Restart { graph, seed }).is_ok()
    }

    /// Pin a node to a position (e.g. while dragging).
    pub fn move_node(&self, key: TopicKey, x: f64, y: f64) -> bool {
        self.commands.send(Command::Move { key, x, y }).is_ok()
    }

    /// Stop stepping the current generation.
    pub fn cancel(&self) -> bool {
        self.commands.send(Command::Cancel).is_ok()
    }

    /// Receive a snapshot after every frame and every command.
    pub fn subscribe(&self) -> watch::Receiver<LayoutSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> LayoutSnapshot {
        self.snapshots.borrow().clone()
    }
}

impl Drop for LayoutAnimator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn frame_loop(
    mut layout: ForceLayout,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<LayoutSnapshot>,
    frame_interval: Duration,
) {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticket: Option<FrameTicket> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(Command::Restart { graph, seed }) => {
                        let next = layout.start(&graph, seed);
                        ticket = layout.is_running().then_some(next);
                        frames.reset();
                    }
                    Some(Command::Move { key, x, y }) => {
                        layout.move_node(&key, x, y);
                    }
                    Some(Command::Cancel) => {
                        layout.cancel();
                        ticket = None;
                    }
                    None => break,
                }
                snapshots.send_replace(layout.snapshot());
            }
            _ = frames.tick(), if ticket.is_some() => {
                let Some(current) = ticket else {
                    continue;
                };
                ticket = match layout.step_frame(current) {
                    FrameOutcome::Continue(next) => Some(next),
                    FrameOutcome::Settled | FrameOutcome::Superseded => None,
                };
                snapshots.send_replace(layout.snapshot());
            }
        }
    }

    tracing::debug!(generation = layout.generation().0, "layout animator stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiki_graph::{normalize, Generation, GraphEdge, LayoutPhase, TopicNode};

    fn graph(topics: &[&str]) -> GraphData {
        let nodes = topics
            .iter()
            .enumerate()
            .map(|(i, topic)| TopicNode {
                id: topic.to_string(),
                key: normalize(topic),
                color_index: i,
            })
            .collect::<Vec<_>>();
        let edges = nodes
            .windows(2)
            .map(|pair| GraphEdge {
                source: pair[0].key.clone(),
                target: pair[1].key.clone(),
            })
            .collect();
        GraphData {
            nodes,
            edges,
            current: topics.last().map(|t| normalize(t)),
        }
    }

    async fn wait_until(
        receiver: &mut watch::Receiver<LayoutSnapshot>,
        done: impl FnMut(&LayoutSnapshot) -> bool,
    ) -> LayoutSnapshot {
        tokio::time::timeout(Duration::from_secs(10), receiver.wait_for(done))
            .await
            .expect("layout did not reach the expected state")
            .expect("layout task stopped")
            .clone()
    }

    #[tokio::test]
    async fn test_runs_to_settled() {
        let animator = LayoutAnimator::spawn(LayoutConfig::default().with_iterations(20), Duration::from_millis(1));
        let mut receiver = animator.subscribe();
        assert_eq!(animator.latest().phase, LayoutPhase::Idle);

        assert!(animator.restart(graph(&["Earth", "Sun", "Moon"]), 7));
        let snapshot = wait_until(&mut receiver, |s| s.is_settled()).await;

        assert_eq!(snapshot.generation, Generation(1));
        assert_eq!(snapshot.steps, 20);
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.edges.len(), 2);
    }

    #[tokio::test]
    async fn test_restart_supersedes_running_generation() {
        let animator = LayoutAnimator::spawn(LayoutConfig::default().with_iterations(30), Duration::from_millis(1));
        let mut receiver = animator.subscribe();

        animator.restart(graph(&["Earth", "Sun"]), 1);
        animator.restart(graph(&["Paris", "France", "Europe"]), 2);

        let snapshot = wait_until(&mut receiver, |s| s.generation == Generation(2) && s.is_settled()).await;
        assert_eq!(snapshot.steps, 30);
        let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Paris", "France", "Europe"]);
    }

    #[tokio::test]
    async fn test_cancel_stops_stepping() {
        let animator =
            LayoutAnimator::spawn(LayoutConfig::default().with_iterations(1_000_000), Duration::from_millis(1));
        let mut receiver = animator.subscribe();

        animator.restart(graph(&["Earth", "Sun"]), 3);
        animator.cancel();

        let snapshot = wait_until(&mut receiver, |s| s.phase == LayoutPhase::Cancelled).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(animator.latest().steps, snapshot.steps);
    }

    #[tokio::test]
    async fn test_empty_graph_settles_without_steps() {
        let animator = LayoutAnimator::spawn(LayoutConfig::default(), Duration::from_millis(1));
        let mut receiver = animator.subscribe();

        animator.restart(GraphData::default(), 0);
        let snapshot = wait_until(&mut receiver, |s| s.generation == Generation(1)).await;
        assert!(snapshot.is_settled());
        assert_eq!(snapshot.steps, 0);
    }

    #[tokio::test]
    async fn test_moved_node_is_published() {
        let animator = LayoutAnimator::spawn(LayoutConfig::default().with_iterations(1), Duration::from_millis(1));
        let mut receiver = animator.subscribe();

        animator.restart(graph(&["Earth"]), 4);
        wait_until(&mut receiver, |s| s.is_settled()).await;

        animator.move_node(normalize("earth"), 10.0, 20.0);
        let snapshot = wait_until(&mut receiver, |s| {
            s.node(&normalize("earth")).is_some_and(|n| n.x == 10.0 && n.y == 20.0)
        })
        .await;
        assert_eq!(snapshot.generation, Generation(1));
    }
}
