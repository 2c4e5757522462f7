//! The Article Generator - the AI service the explorer talks to.
//!
//! Implementations wrap a concrete model API. The explorer only relies on
//! this trait; it never inspects the generated text beyond the `[[...]]`
//! link markers.

pub mod prompt;

use async_trait::async_trait;

use crate::deep_dive::DeepDiveKind;
use crate::error::GenerationError;

/// Source of generated articles.
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    /// Generate the article for a topic. The text should contain zero or
    /// more `[[Topic]]` markers.
    async fn generate_article(&self, topic: &str) -> Result<String, GenerationError>;

    /// Generate supplementary content for an existing article.
    ///
    /// Quiz responses must be a JSON array matching
    /// [`prompt::quiz_response_schema`]; image responses are a URL.
    async fn generate_deep_dive(
        &self,
        topic: &str,
        article: &str,
        kind: DeepDiveKind,
    ) -> Result<String, GenerationError> {
        let _ = (topic, article);
        Err(GenerationError::Unsupported(kind))
    }
}
