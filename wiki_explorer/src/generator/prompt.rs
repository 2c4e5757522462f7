//! Prompt templates for generator implementations.

use serde_json::json;

use crate::deep_dive::DeepDiveKind;

/// How many `[[...]]` markers an article should carry.
pub const LINKS_PER_ARTICLE: (usize, usize) = (5, 7);

/// Number of questions requested for a quiz.
pub const QUIZ_QUESTIONS: usize = 3;

/// The encyclopedia article prompt for a topic.
pub fn article_prompt(topic: &str) -> String {
    let (min_links, max_links) = LINKS_PER_ARTICLE;
    format!(
        "You write entries for an endless encyclopedia. Write a clear, neutral and \
         well-structured article about \"{topic}\".\n\
         \n\
         Rules:\n\
         - Pick {min_links} to {max_links} key related concepts, terms or entities mentioned in the \
         article and wrap each one exactly in double square brackets, like [[this]].\n\
         - Bracketed terms must be in the same language as \"{topic}\".\n\
         - Use plain paragraphs only: no headings, bold text, lists or other markdown.\n\
         - Start with the article itself, without any preamble.\n\
         - Reply with the article text and nothing else."
    )
}

/// The prompt for one kind of deep dive over an existing article.
pub fn deep_dive_prompt(kind: DeepDiveKind, topic: &str, article: &str) -> String {
    let task = match kind {
        DeepDiveKind::Simple => {
            "Explain the topic so a ten-year-old understands it, in one short paragraph.".to_string()
        }
        DeepDiveKind::Analogy => {
            "Give one vivid everyday analogy that captures the core idea, in a few sentences."
                .to_string()
        }
        DeepDiveKind::Quiz => format!(
            "Write {QUIZ_QUESTIONS} multiple-choice questions about the article. Reply with a JSON \
             array only; each element has \"question\", \"options\" (4 strings) and \"answer\" \
             (exactly one of the options)."
        ),
        DeepDiveKind::Image => {
            "Describe a single clear illustration of the topic suitable for an image model, \
             without any text in the image."
                .to_string()
        }
    };

    format!(
        "Topic: \"{topic}\"\n\
         \n\
         Article:\n\
         {article}\n\
         \n\
         Task: {task}\n\
         Do not use [[link]] markers."
    )
}

/// JSON schema of a quiz response, for APIs with structured output.
pub fn quiz_response_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "question": { "type": "string" },
                "options": { "type": "array", "items": { "type": "string" } },
                "answer": { "type": "string" }
            },
            "required": ["question", "options", "answer"]
        }
    })
}
