//! Deep dive - supplementary content generated for an article.
//!
//! Each kind is generated at most once per topic: a simplified explanation,
//! an analogy, a multiple-choice quiz, and an illustration.

mod quiz;

pub use quiz::*;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// The kinds of supplementary content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeepDiveKind {
    /// The article explained for a young reader.
    Simple,
    Analogy,
    /// A JSON array of multiple-choice questions.
    Quiz,
    /// An image URL (or data URI).
    Image,
}

impl DeepDiveKind {
    pub const ALL: [DeepDiveKind; 4] = [
        DeepDiveKind::Simple,
        DeepDiveKind::Analogy,
        DeepDiveKind::Quiz,
        DeepDiveKind::Image,
    ];
}

impl std::fmt::Display for DeepDiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeepDiveKind::Simple => "a simple explanation",
            DeepDiveKind::Analogy => "an analogy",
            DeepDiveKind::Quiz => "a quiz",
            DeepDiveKind::Image => "a visualization",
        };
        f.write_str(label)
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// The correct option, verbatim.
    pub answer: String,
}

/// Deep dive content generated so far for one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDiveContent {
    pub simple_explanation: Option<String>,
    pub analogy: Option<String>,
    pub quiz: Option<Vec<QuizQuestion>>,
    pub image_url: Option<String>,
}

impl DeepDiveContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a kind was already generated.
    pub fn has(&self, kind: DeepDiveKind) -> bool {
        match kind {
            DeepDiveKind::Simple => self.simple_explanation.is_some(),
            DeepDiveKind::Analogy => self.analogy.is_some(),
            DeepDiveKind::Quiz => self.quiz.is_some(),
            DeepDiveKind::Image => self.image_url.is_some(),
        }
    }

    /// Store a raw generator response for `kind`.
    ///
    /// Quiz responses are parsed; a malformed quiz leaves the content untouched.
    pub fn apply(&mut self, kind: DeepDiveKind, raw: String) -> Result<(), GenerationError> {
        match kind {
            DeepDiveKind::Simple => self.simple_explanation = Some(raw.trim().to_string()),
            DeepDiveKind::Analogy => self.analogy = Some(raw.trim().to_string()),
            DeepDiveKind::Quiz => self.quiz = Some(parse_quiz(&raw)?),
            DeepDiveKind::Image => {
                let url = raw.trim();
                if url.is_empty() {
                    return Err(GenerationError::InvalidResponse("empty image URL".into()));
                }
                self.image_url = Some(url.to_string());
            }
        }
        Ok(())
    }
}

/// Parse a quiz response: a JSON array of `{question, options, answer}`.
///
/// A surrounding markdown code fence is tolerated. Every answer must be one
/// of its question's options.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
    let body = strip_code_fence(raw);
    let questions: Vec<QuizQuestion> = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("quiz is not valid JSON: {e}")))?;

    if questions.is_empty() {
        return Err(GenerationError::InvalidResponse("quiz has no questions".into()));
    }
    for (i, question) in questions.iter().enumerate() {
        if !question.options.contains(&question.answer) {
            return Err(GenerationError::InvalidResponse(format!(
                "answer of question {} is not one of its options",
                i + 1
            )));
        }
    }

    Ok(questions)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
