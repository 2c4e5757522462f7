//! A user's attempt at a generated quiz.

use serde::{Deserialize, Serialize};

use super::QuizQuestion;

/// Selected answers for a quiz, before and after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    answers: Vec<Option<String>>,
    submitted: bool,
}

impl QuizAttempt {
    /// Start an attempt with no answers selected.
    pub fn new(questions: &[QuizQuestion]) -> Self {
        Self {
            answers: vec![None; questions.len()],
            submitted: false,
        }
    }

    /// Select an option. Ignored after submission or for an unknown question.
    pub fn select(&mut self, question: usize, option: impl Into<String>) -> bool {
        if self.submitted {
            return false;
        }
        match self.answers.get_mut(question) {
            Some(slot) => {
                *slot = Some(option.into());
                true
            }
            None => false,
        }
    }

    pub fn answer(&self, question: usize) -> Option<&str> {
        self.answers.get(question).and_then(|a| a.as_deref())
    }

    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Clear all answers and reopen the attempt.
    pub fn retry(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.submitted = false;
    }

    /// Whether the selected answer of a question is correct.
    pub fn is_correct(&self, questions: &[QuizQuestion], question: usize) -> bool {
        match (self.answer(question), questions.get(question)) {
            (Some(answer), Some(q)) => answer == q.answer,
            _ => false,
        }
    }

    /// Number of correctly answered questions.
    pub fn score(&self, questions: &[QuizQuestion]) -> usize {
        (0..questions.len())
            .filter(|&i| self.is_correct(questions, i))
            .count()
    }
}
