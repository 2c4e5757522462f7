//! Article Store - generated articles and the links extracted from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::links::extract_links;
use crate::topic::{normalize, TopicKey};

/// Generated article text keyed by normalized topic.
pub type ArticleCache = HashMap<TopicKey, String>;

/// Linked topics of each article, in first-seen order.
pub type PageLinks = HashMap<TopicKey, Vec<String>>;

/// Cache of generated articles and their outgoing links.
///
/// An entry is written exactly once per key, on the first successful fetch,
/// and never overwritten or evicted during a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleStore {
    articles: ArticleCache,
    page_links: PageLinks,
}

impl ArticleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts.
    ///
    /// Articles without a recorded link list get one extracted from their text.
    pub fn from_parts(articles: ArticleCache, mut page_links: PageLinks) -> Self {
        for (key, text) in &articles {
            page_links
                .entry(key.clone())
                .or_insert_with(|| extract_links(text));
        }
        page_links.retain(|key, _| articles.contains_key(key));
        Self {
            articles,
            page_links,
        }
    }

    /// Store an article and its extracted links.
    ///
    /// Returns `false` without touching anything if the topic already has an
    /// article.
    pub fn insert(&mut self, topic: &str, text: impl Into<String>) -> bool {
        let key = normalize(topic);
        if self.articles.contains_key(&key) {
            return false;
        }
        let text = text.into();
        self.page_links.insert(key.clone(), extract_links(&text));
        self.articles.insert(key, text);
        true
    }

    /// Get the article for a topic (any casing).
    pub fn article(&self, topic: &str) -> Option<&str> {
        self.articles.get(&normalize(topic)).map(String::as_str)
    }

    /// Get the linked topics of an article (any casing).
    pub fn links(&self, topic: &str) -> Option<&[String]> {
        self.links_by_key(&normalize(topic))
    }

    pub fn links_by_key(&self, key: &TopicKey) -> Option<&[String]> {
        self.page_links.get(key).map(Vec::as_slice)
    }

    /// Check whether a topic has an article.
    pub fn contains(&self, topic: &str) -> bool {
        self.contains_key(&normalize(topic))
    }

    pub fn contains_key(&self, key: &TopicKey) -> bool {
        self.articles.contains_key(key)
    }

    pub fn articles(&self) -> &ArticleCache {
        &self.articles
    }

    pub fn page_links(&self) -> &PageLinks {
        &self.page_links
    }

    /// Number of cached articles.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Drop everything (full session reset only).
    pub fn clear(&mut self) {
        self.articles.clear();
        self.page_links.clear();
    }
}
