//! Scripted generator for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wiki_graph::{normalize, TopicKey};

use crate::deep_dive::DeepDiveKind;
use crate::error::GenerationError;
use crate::generator::ArticleGenerator;

/// Serves canned articles and records every article request.
///
/// Unknown topics fail. The topic "slow" never answers within a test timeout
/// and the topic "panic" panics. Quizzes about "riddle" are not JSON.
#[derive(Default)]
pub struct FakeGenerator {
    articles: HashMap<TopicKey, String>,
    calls: Mutex<Vec<TopicKey>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_article(mut self, topic: &str, text: &str) -> Self {
        self.articles.insert(normalize(topic), text.to_string());
        self
    }

    /// Number of article requests for a topic.
    pub fn calls_for(&self, topic: &str) -> usize {
        let key = normalize(topic);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == key)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ArticleGenerator for FakeGenerator {
    async fn generate_article(&self, topic: &str) -> Result<String, GenerationError> {
        let key = normalize(topic);
        self.calls.lock().unwrap().push(key.clone());

        match key.as_str() {
            "slow" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
            "panic" => panic!("generator crashed"),
            _ => self
                .articles
                .get(&key)
                .cloned()
                .ok_or_else(|| GenerationError::Service(format!("no article for {topic}"))),
        }
    }

    async fn generate_deep_dive(
        &self,
        topic: &str,
        _article: &str,
        kind: DeepDiveKind,
    ) -> Result<String, GenerationError> {
        match kind {
            DeepDiveKind::Simple => Ok(format!("{topic} in simple words")),
            DeepDiveKind::Analogy => Err(GenerationError::Service("analogy unavailable".into())),
            DeepDiveKind::Quiz if normalize(topic).as_str() == "riddle" => {
                Ok("Sure! Here is a fun quiz about riddles.".to_string())
            }
            DeepDiveKind::Quiz => Ok(format!(
                r#"```json
[{{"question": "What is {topic}?", "options": ["A place", "A cheese"], "answer": "A place"}}]
```"#
            )),
            DeepDiveKind::Image => Ok("data:image/png;base64,iVBORw0KGgo=".to_string()),
        }
    }
}
