//! Link markers embedded in generated article text.
//!
//! An article refers to other explorable topics with `[[Topic]]` markers:
//! two opening brackets, any characters (matched non-greedily, never across
//! a line break), two closing brackets. Unterminated markers are plain text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::topic::normalize;

fn link_marker() -> &'static Regex {
    static LINK_MARKER: OnceLock<Regex> = OnceLock::new();
    LINK_MARKER.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("link marker pattern is valid"))
}

/// Extract the unique set of linked topics from article text.
///
/// Topics are deduplicated by their normalized key; the first literal
/// occurrence keeps its casing and the result is in first-seen order.
/// Blank markers (`[[ ]]`) are skipped.
pub fn extract_links(article_text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for captures in link_marker().captures_iter(article_text) {
        let Some(inner) = captures.get(1) else {
            continue;
        };
        let key = normalize(inner.as_str());
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            links.push(inner.as_str().to_string());
        }
    }

    links
}

/// A run of article text, either plain prose or a link marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Text(String),
    /// The inner text of a `[[...]]` marker, verbatim.
    Link(String),
}

/// A non-blank paragraph of an article split into segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
}

impl Paragraph {
    /// Linked topics in this paragraph, in order (not deduplicated).
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Link(topic) => Some(topic.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// The paragraph as plain prose with markers replaced by their text.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Link(text) => text.as_str(),
            })
            .collect()
    }
}

/// Split article text into paragraphs of text and link segments.
///
/// Paragraphs are separated by line breaks; blank lines are dropped.
pub fn parse_article(article_text: &str) -> Vec<Paragraph> {
    article_text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(parse_paragraph)
        .collect()
}

fn parse_paragraph(line: &str) -> Paragraph {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for captures in link_marker().captures_iter(line) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            segments.push(Segment::Text(line[cursor..whole.start()].to_string()));
        }
        segments.push(Segment::Link(inner.as_str().to_string()));
        cursor = whole.end();
    }

    if cursor < line.len() {
        segments.push(Segment::Text(line[cursor..].to_string()));
    }

    Paragraph { segments }
}
