//! Exploration State Machine - the session controller.
//!
//! The [`Explorer`] owns the whole session: the history trail, the viewed
//! topics, the article store, the single error slot and the background
//! requests. All mutation goes through its named operations.
//!
//! Whenever an operation changes the last entry of the history, the explorer
//! fires the "current topic changed" reaction itself:
//! 1. **View**: Add the current topic to the viewed topics
//! 2. **Cache**: If its article is cached, stop here
//! 3. **Fetch**: Otherwise issue one generator request (unless one is already
//!    in flight for the same key)
//!
//! Requests run on tokio tasks and are applied when the caller awaits
//! [`Explorer::settle_next`] or [`Explorer::settle`]. A success writes the
//! article and its links; a failure sets the error and removes the topic from
//! the history so the trail never points at a missing article.
//!
//! Operations that issue requests must be called from within a tokio runtime.

mod fetch;
mod quick_jump;
mod tasks;

pub use fetch::*;
pub use quick_jump::*;
pub use tasks::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

use wiki_graph::{
    is_blank, normalize, same_topic, ArticleCache, ArticleStore, GraphData, History, PageLinks,
    TopicKey, ViewedTopics,
};

use crate::config::ExplorerConfig;
use crate::deep_dive::{DeepDiveContent, DeepDiveKind};
use crate::error::{ExplorationError, GenerationError, NavigationError};
use crate::generator::ArticleGenerator;
use crate::persistence::{keys, KeyValueStore, MemoryStore, Persistence};

/// Identifier of an exploration session. Regenerated by a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The exploration session and its state machine.
pub struct Explorer<S: KeyValueStore = MemoryStore> {
    session_id: SessionId,
    history: History,
    viewed: ViewedTopics,
    store: ArticleStore,
    error: Option<ExplorationError>,

    /// Keys with an article request in flight.
    pending: HashSet<TopicKey>,
    /// Pending keys requested only through the exploration queue.
    background: HashSet<TopicKey>,
    tasks: TaskQueue,
    deep_dives: HashMap<TopicKey, DeepDiveContent>,
    deep_dives_loading: HashSet<(TopicKey, DeepDiveKind)>,

    /// Bumped whenever the viewed topics or page links change.
    graph_revision: u64,

    generator: Arc<dyn ArticleGenerator>,
    persistence: Persistence<S>,
    config: ExplorerConfig,
    in_flight: JoinSet<Settlement>,
}

impl Explorer<MemoryStore> {
    /// An explorer with default configuration and a fresh in-memory store.
    pub fn in_memory(generator: Arc<dyn ArticleGenerator>) -> Self {
        Self::new(generator, MemoryStore::new(), ExplorerConfig::default())
    }
}

impl<S: KeyValueStore> Explorer<S> {
    /// Create an explorer, loading any session persisted in `store`.
    pub fn new(generator: Arc<dyn ArticleGenerator>, store: S, config: ExplorerConfig) -> Self {
        let mut persistence = Persistence::new(store, config.storage_namespace.clone());

        let history: History = persistence.load_or_default(keys::HISTORY);
        let viewed: ViewedTopics = persistence.load_or_default(keys::VIEWED_TOPICS);
        let articles: ArticleCache = persistence.load_or_default(keys::ARTICLES);
        let page_links: PageLinks = persistence.load_or_default(keys::PAGE_LINKS);
        let store = ArticleStore::from_parts(articles, page_links);

        let session_id = match persistence.load(keys::SESSION, None::<SessionId>) {
            Some(id) => id,
            None => {
                let id = SessionId::new();
                persistence.save(keys::SESSION, &id);
                id
            }
        };

        tracing::info!(
            session = %session_id,
            history = history.len(),
            viewed = viewed.len(),
            articles = store.len(),
            "explorer session loaded"
        );

        Self {
            session_id,
            history,
            viewed,
            store,
            error: None,
            pending: HashSet::new(),
            background: HashSet::new(),
            tasks: TaskQueue::new(),
            deep_dives: HashMap::new(),
            deep_dives_loading: HashSet::new(),
            graph_revision: 0,
            generator,
            persistence,
            config,
            in_flight: JoinSet::new(),
        }
    }

    /// Start a new trail at `topic`. Blank topics are ignored.
    ///
    /// Viewed topics and cached articles are kept, so revisits need no fetch.
    pub fn start_exploration(&mut self, topic: &str) {
        if is_blank(topic) {
            tracing::debug!("ignoring blank exploration topic");
            return;
        }
        let topic = topic.trim();
        tracing::info!(session = %self.session_id, topic, "starting exploration");

        self.error = None;
        self.history.reset_to(topic);
        self.current_topic_changed();
    }

    /// Truncate the history to `0..=index`.
    pub fn navigate_to_history_index(&mut self, index: usize) -> Result<(), NavigationError> {
        let len = self.history.len();
        if !self.history.truncate_to(index) {
            return Err(NavigationError::IndexOutOfRange { index, len });
        }
        tracing::info!(session = %self.session_id, index, "navigated back in history");

        self.error = None;
        self.current_topic_changed();
        Ok(())
    }

    /// Follow a link: append `topic` to the history. Blank topics are ignored.
    pub fn explore_topic(&mut self, topic: &str) {
        if is_blank(topic) {
            return;
        }
        let topic = topic.trim();
        tracing::info!(session = %self.session_id, topic, "exploring topic");

        self.error = None;
        self.history.push(topic);
        self.current_topic_changed();
    }

    /// Go to `topic`: no-op if it is current, back to its first occurrence
    /// if it is on the trail, appended otherwise.
    pub fn jump_to_topic(&mut self, topic: &str) {
        if is_blank(topic) {
            return;
        }
        if self
            .history
            .current()
            .is_some_and(|current| same_topic(current, topic))
        {
            return;
        }

        match self.history.position(topic) {
            Some(index) => {
                tracing::info!(session = %self.session_id, topic, index, "jumping back to topic");
                self.history.truncate_to(index);
                self.error = None;
                self.current_topic_changed();
            }
            None => self.explore_topic(topic),
        }
    }

    /// Clear the trail, the error and the exploration queue. Caches are kept.
    pub fn go_home(&mut self) {
        self.history.clear();
        self.error = None;
        self.tasks.clear();
        self.persistence.save(keys::HISTORY, &self.history);
    }

    /// Full session reset. In-flight requests are dropped and never applied.
    pub fn reset_all(&mut self) {
        self.in_flight = JoinSet::new();
        self.history.clear();
        self.viewed.clear();
        self.store.clear();
        self.error = None;
        self.pending.clear();
        self.background.clear();
        self.tasks.clear();
        self.deep_dives.clear();
        self.deep_dives_loading.clear();
        self.graph_revision += 1;
        self.session_id = SessionId::new();

        tracing::info!(session = %self.session_id, "session reset");

        self.persistence.save(keys::SESSION, &self.session_id);
        self.save_history();
        self.save_viewed();
        self.save_articles();
    }

    /// Re-fire the reaction for the current topic, e.g. after loading a
    /// persisted session whose current article is missing.
    pub fn resume(&mut self) {
        if !self.history.is_empty() {
            self.current_topic_changed();
        }
    }

    fn current_topic_changed(&mut self) {
        self.save_history();

        let Some(current) = self.history.current().map(str::to_string) else {
            return;
        };

        if self.viewed.insert(&current) {
            self.graph_revision += 1;
            self.save_viewed();
        }

        if self.store.contains(&current) {
            tracing::debug!(topic = %current, "article cache hit");
            return;
        }

        self.issue_article_fetch(&current, false);
    }

    /// Issue a generator request unless the article is cached or already in flight.
    ///
    /// A `background` request becomes a trail request as soon as the trail
    /// asks for the same key.
    fn issue_article_fetch(&mut self, topic: &str, background: bool) {
        let key = normalize(topic);
        if self.store.contains_key(&key) {
            return;
        }
        if !self.pending.insert(key.clone()) {
            if !background {
                self.background.remove(&key);
            }
            tracing::debug!(topic, "sharing in-flight article request");
            return;
        }
        if background {
            self.background.insert(key.clone());
        }

        tracing::info!(session = %self.session_id, topic, "requesting article");

        let generator = Arc::clone(&self.generator);
        let timeout = self.config.fetch_timeout();
        let topic = topic.to_string();
        self.in_flight.spawn(async move {
            let request_topic = topic.clone();
            let result = run_with_timeout(timeout, async move {
                generator.generate_article(&request_topic).await
            })
            .await;
            Settlement {
                topic,
                key,
                request: FetchRequest::Article,
                result,
            }
        });
    }

    /// Wait for the next request to finish and apply it.
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<SettledFetch> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(settlement) => return Some(self.apply(settlement)),
                Err(error) => {
                    tracing::error!(%error, "request task ended without a result");
                }
            }
        }
    }

    /// Wait for every in-flight request and apply them in completion order.
    pub async fn settle(&mut self) -> Vec<SettledFetch> {
        let mut settled = Vec::new();
        while let Some(fetch) = self.settle_next().await {
            settled.push(fetch);
        }
        settled
    }

    /// Number of requests not yet settled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn apply(&mut self, settlement: Settlement) -> SettledFetch {
        let Settlement {
            topic,
            key,
            request,
            result,
        } = settlement;

        let error = match request {
            FetchRequest::Article => self.apply_article(&topic, &key, result),
            FetchRequest::DeepDive(kind) => self.apply_deep_dive(&topic, key, kind, result),
        };

        SettledFetch {
            topic,
            request,
            error,
        }
    }

    fn apply_article(
        &mut self,
        topic: &str,
        key: &TopicKey,
        result: Result<String, GenerationError>,
    ) -> Option<ExplorationError> {
        self.pending.remove(key);
        let background = self.background.remove(key);

        match result {
            Ok(text) => {
                if self.store.insert(topic, text) {
                    self.graph_revision += 1;
                    self.save_articles();
                }
                tracing::info!(session = %self.session_id, topic, "article ready");

                self.error = None;
                self.tasks.mark(key, FetchStatus::Ready);
                None
            }
            Err(generation_error) => {
                let error = ExplorationError::article_failed(topic, &generation_error);
                tracing::warn!(session = %self.session_id, topic, error = %generation_error, "article request failed");

                let was_current = self.history.current().map(normalize).as_ref() == Some(key);
                let removed = self.history.remove_topic(topic);
                self.tasks.mark(key, FetchStatus::Failed(generation_error.to_string()));

                if removed > 0 || !background {
                    self.error = Some(error.clone());
                }
                if removed > 0 {
                    if was_current {
                        self.current_topic_changed();
                    } else {
                        self.save_history();
                    }
                }
                Some(error)
            }
        }
    }

    /// Request an article in the background without touching the history.
    ///
    /// Blank and already queued topics are ignored. A cached topic that is
    /// not on the trail is opened directly.
    pub fn request_article(&mut self, topic: &str) {
        if is_blank(topic) || self.tasks.contains(topic) {
            return;
        }
        let topic = topic.trim();

        if self.store.contains(topic) {
            if !self.history.contains(topic) {
                self.start_exploration(topic);
            }
            return;
        }

        self.tasks.push(topic, FetchStatus::Pending);
        self.issue_article_fetch(topic, true);
    }

    /// Re-issue a failed background request. Returns `false` unless the task failed.
    pub fn retry_task(&mut self, topic: &str) -> bool {
        let Some(task) = self.tasks.get(topic) else {
            return false;
        };
        if !matches!(task.status, FetchStatus::Failed(_)) {
            return false;
        }
        let topic = task.topic.clone();

        self.tasks.mark(&normalize(&topic), FetchStatus::Pending);
        self.issue_article_fetch(&topic, true);
        true
    }

    /// Forget a background request. Its fetch, if running, still completes
    /// and still never sets the session error.
    pub fn dismiss_task(&mut self, topic: &str) -> bool {
        self.tasks.remove(topic)
    }

    /// Start a new trail at a queued topic and dismiss its task.
    pub fn open_task(&mut self, topic: &str) {
        if is_blank(topic) {
            return;
        }
        self.start_exploration(topic);
        self.tasks.remove(topic);
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Ask for supplementary content on a topic with a cached article.
    ///
    /// Returns `false` (and does nothing) if the article is missing, or the
    /// content was already generated or is loading.
    pub fn request_deep_dive(&mut self, topic: &str, kind: DeepDiveKind) -> bool {
        let key = normalize(topic);
        let Some(article) = self.store.article(topic).map(str::to_string) else {
            return false;
        };
        if self.deep_dives.get(&key).is_some_and(|content| content.has(kind)) {
            return false;
        }
        if !self.deep_dives_loading.insert((key.clone(), kind)) {
            return false;
        }

        let topic = self
            .viewed
            .display_name(&key)
            .unwrap_or(topic.trim())
            .to_string();
        tracing::info!(session = %self.session_id, topic = %topic, ?kind, "requesting deep dive");

        let generator = Arc::clone(&self.generator);
        let timeout = self.config.fetch_timeout();
        self.in_flight.spawn(async move {
            let request_topic = topic.clone();
            let result = run_with_timeout(timeout, async move {
                generator
                    .generate_deep_dive(&request_topic, &article, kind)
                    .await
            })
            .await;
            Settlement {
                topic,
                key,
                request: FetchRequest::DeepDive(kind),
                result,
            }
        });
        true
    }

    fn apply_deep_dive(
        &mut self,
        topic: &str,
        key: TopicKey,
        kind: DeepDiveKind,
        result: Result<String, GenerationError>,
    ) -> Option<ExplorationError> {
        self.deep_dives_loading.remove(&(key.clone(), kind));

        let applied = result.and_then(|raw| {
            let mut content = self.deep_dives.get(&key).cloned().unwrap_or_default();
            content.apply(kind, raw)?;
            self.deep_dives.insert(key, content);
            Ok(())
        });
        match applied {
            Ok(()) => {
                tracing::info!(session = %self.session_id, topic, ?kind, "deep dive ready");
                None
            }
            Err(generation_error) => {
                tracing::warn!(session = %self.session_id, topic, ?kind, error = %generation_error, "deep dive failed");
                let error = ExplorationError::deep_dive_failed(topic, kind, &generation_error);
                self.error = Some(error.clone());
                Some(error)
            }
        }
    }

    /// Deep dive content generated so far for a topic.
    pub fn deep_dive(&self, topic: &str) -> Option<&DeepDiveContent> {
        self.deep_dives.get(&normalize(topic))
    }

    pub fn is_deep_dive_loading(&self, topic: &str, kind: DeepDiveKind) -> bool {
        self.deep_dives_loading.contains(&(normalize(topic), kind))
    }

    /// Palette entries for a query (see [`quick_jump`]).
    pub fn quick_jump(&self, query: &str) -> Vec<JumpTarget> {
        quick_jump(&self.viewed, query)
    }

    /// Act on a palette entry.
    pub fn select_jump(&mut self, target: &JumpTarget) {
        match target {
            JumpTarget::Search(query) => self.start_exploration(query),
            JumpTarget::Topic(topic) => self.jump_to_topic(topic),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_topic(&self) -> Option<&str> {
        self.history.current()
    }

    pub fn viewed_topics(&self) -> &ViewedTopics {
        &self.viewed
    }

    /// Viewed topics, most recently first viewed first.
    pub fn viewed_recent_first(&self) -> Vec<&str> {
        self.viewed.recent_first().collect()
    }

    pub fn articles(&self) -> &ArticleStore {
        &self.store
    }

    /// The article for a topic. `None` while it is loading or after it failed.
    pub fn article(&self, topic: &str) -> Option<&str> {
        self.store.article(topic)
    }

    pub fn page_links(&self, topic: &str) -> Option<&[String]> {
        self.store.links(topic)
    }

    /// Links of the current topic's article (empty while loading).
    pub fn current_page_links(&self) -> &[String] {
        self.history
            .current()
            .and_then(|topic| self.store.links(topic))
            .unwrap_or(&[])
    }

    /// Whether an article request for the topic is in flight.
    pub fn is_pending(&self, topic: &str) -> bool {
        self.pending.contains(&normalize(topic))
    }

    pub fn error(&self) -> Option<&ExplorationError> {
        self.error.as_ref()
    }

    /// Dismiss the current error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The graph of viewed topics for the layout engine.
    pub fn graph_data(&self) -> GraphData {
        GraphData::derive(&self.viewed, &self.store, &self.history)
    }

    /// Changes whenever [`graph_data`](Self::graph_data) gains or loses nodes or edges.
    pub fn graph_revision(&self) -> u64 {
        self.graph_revision
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn save_history(&mut self) {
        self.persistence.save(keys::HISTORY, &self.history);
    }

    fn save_viewed(&mut self) {
        self.persistence.save(keys::VIEWED_TOPICS, &self.viewed);
    }

    fn save_articles(&mut self) {
        self.persistence.save(keys::ARTICLES, self.store.articles());
        self.persistence.save(keys::PAGE_LINKS, self.store.page_links());
    }
}
