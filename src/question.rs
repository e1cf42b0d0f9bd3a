//! Question records and the subject-keyed question bank
//!
//! Questions are plain data: a prompt, a handful of answer options, the
//! identity of the correct option, and a subject tag. The engine never
//! performs I/O; callers feed the bank raw records or JSON bytes obtained
//! however they like (bundled files, an HTTP fetch, memory).

use std::collections::{HashMap, HashSet};

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A subject tag grouping related questions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    /// Creates a subject tag from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the subject name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The identity of an answer option within its question
///
/// Stable across shuffles; presentation positions are a separate concern
/// handled by [`crate::shuffle::OptionMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(usize);

impl OptionId {
    /// Creates an option identity from its index in the question's options
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index of this option in the question's options
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single trivia question
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The question text shown to the player
    #[garde(length(chars, min = crate::constants::question::MIN_PROMPT_LENGTH, max = crate::constants::question::MAX_PROMPT_LENGTH))]
    pub prompt: String,
    /// The answer options, in their stable (unshuffled) order
    #[garde(
        length(min = crate::constants::question::MIN_OPTION_COUNT, max = crate::constants::question::MAX_OPTION_COUNT),
        inner(length(chars, max = crate::constants::question::MAX_OPTION_LENGTH))
    )]
    pub options: Vec<String>,
    /// The identity of the correct option
    #[garde(skip)]
    pub answer: OptionId,
    /// The subject this question belongs to
    #[garde(skip)]
    pub subject: Subject,
}

impl Question {
    /// Validates the question's content and its answer reference
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalid`] if content limits are violated, or
    /// [`Error::AnswerOutOfRange`] if `answer` does not reference one of
    /// the options.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()?;
        if self.answer.index() >= self.options.len() {
            return Err(Error::AnswerOutOfRange {
                answer: self.answer.index(),
                options: self.options.len(),
            });
        }
        Ok(())
    }

    /// Returns the text of the correct option
    pub fn correct_text(&self) -> &str {
        &self.options[self.answer.index()]
    }
}

/// Errors raised while building a question bank
#[derive(Debug, Error)]
pub enum Error {
    /// The question violates a content limit
    #[error("invalid question: {0}")]
    Invalid(#[from] garde::Report),
    /// The correct-answer reference points outside the options
    #[error("answer {answer} does not reference one of the {options} options")]
    AnswerOutOfRange {
        /// The out-of-range answer index
        answer: usize,
        /// How many options the question has
        options: usize,
    },
    /// The JSON payload could not be parsed as question records
    #[error("malformed question data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An untagged question record as found in per-subject JSON files
#[derive(Debug, Deserialize)]
struct RawQuestion {
    prompt: String,
    options: Vec<String>,
    answer: OptionId,
}

/// A validated collection of questions keyed by subject
///
/// Every question in the bank satisfies the content limits and the
/// answer-reference invariant; insertion is the only way in.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Questions grouped under their subject tag
    by_subject: HashMap<Subject, Vec<Question>>,
}

impl QuestionBank {
    /// Adds a question to the bank under its subject
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the question fails validation; the bank is
    /// unchanged in that case.
    pub fn insert(&mut self, question: Question) -> Result<(), Error> {
        question.check()?;
        self.by_subject
            .entry(question.subject.clone())
            .or_default()
            .push(question);
        Ok(())
    }

    /// Loads a subject's questions from a JSON array of records
    ///
    /// Each record carries `prompt`, `options`, and `answer`; the subject
    /// tag is applied on load. Returns how many questions were added.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] on malformed JSON or on the first invalid
    /// record; records before it remain in the bank.
    pub fn load_json(&mut self, subject: &Subject, bytes: &[u8]) -> Result<usize, Error> {
        let records: Vec<RawQuestion> = serde_json::from_slice(bytes)?;
        let count = records.len();

        for record in records {
            self.insert(Question {
                prompt: record.prompt,
                options: record.options,
                answer: record.answer,
                subject: subject.clone(),
            })?;
        }

        Ok(count)
    }

    /// Collects the pool of questions for a set of subjects
    ///
    /// The order is the bank's insertion order; rounds shuffle the pool
    /// themselves. Unknown subjects contribute nothing.
    pub fn pool(&self, subjects: &HashSet<Subject>) -> Vec<Question> {
        subjects
            .iter()
            .filter_map(|subject| self.by_subject.get(subject))
            .flatten()
            .cloned()
            .collect_vec()
    }

    /// Returns the total number of questions across all subjects
    pub fn len(&self) -> usize {
        self.by_subject.values().map(Vec::len).sum()
    }

    /// Checks whether the bank holds no questions
    pub fn is_empty(&self) -> bool {
        self.by_subject.values().all(Vec::is_empty)
    }

    /// Iterates over the subjects present in the bank
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.by_subject.keys()
    }
}
