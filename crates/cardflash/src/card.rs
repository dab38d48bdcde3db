//! The flashcard record.
//!
//! A [`Flashcard`] is a passive value: a question, an answer and two
//! timestamps. Its id is `None` until a [`FlashcardStore`](crate::FlashcardStore)
//! persists it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{Error, Result};
use crate::sql::format_timestamp;

/// Identity of a persisted flashcard.
///
/// Always a positive integer. Ids are handed out by the store and never
/// reused after a card is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(i64);

impl CardId {
    /// Wrap a raw id, rejecting zero and negative values.
    pub fn new(raw: i64) -> Result<Self> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(Error::validation(format!(
                "card id must be a positive integer, got {}",
                raw
            )))
        }
    }

    /// The raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Ids read back from SQLite are assigned by `AUTOINCREMENT` and always
    /// positive.
    pub(crate) fn from_row(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for CardId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let raw: i64 = trimmed
            .parse()
            .map_err(|_| Error::validation(format!("'{}' is not a valid card id", trimmed)))?;
        Self::new(raw)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question/answer pair with creation and update timestamps.
///
/// `updated_on == created_on` means the card has never been edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    id: Option<CardId>,
    question: String,
    answer: String,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
}

impl Flashcard {
    /// Create an unsaved card stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either text is empty or only
    /// whitespace.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Result<Self> {
        let question = question.into();
        let answer = answer.into();
        validate_text("question", &question)?;
        validate_text("answer", &answer)?;

        let now = now();
        Ok(Self {
            id: None,
            question,
            answer,
            created_on: now,
            updated_on: now,
        })
    }

    /// Rebuild a persisted card from its stored columns.
    pub(crate) fn from_parts(
        id: CardId,
        question: String,
        answer: String,
        created_on: DateTime<Utc>,
        updated_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            question,
            answer,
            created_on,
            updated_on,
        }
    }

    /// The store-assigned id, or `None` before insertion.
    pub fn id(&self) -> Option<CardId> {
        self.id
    }

    /// The question side.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer side.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// When the card was created. Never changes.
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// When the card was last edited, or `created_on` if it never was.
    pub fn updated_on(&self) -> DateTime<Utc> {
        self.updated_on
    }

    /// Whether the card has been edited since creation.
    pub fn was_updated(&self) -> bool {
        self.updated_on > self.created_on
    }

    /// Replace the question.
    pub fn set_question(&mut self, question: impl Into<String>) -> Result<()> {
        let question = question.into();
        validate_text("question", &question)?;
        self.question = question;
        Ok(())
    }

    /// Replace the answer.
    pub fn set_answer(&mut self, answer: impl Into<String>) -> Result<()> {
        let answer = answer.into();
        validate_text("answer", &answer)?;
        self.answer = answer;
        Ok(())
    }

    /// Move the update timestamp. It may never precede `created_on`.
    pub fn set_updated_on(&mut self, at: DateTime<Utc>) -> Result<()> {
        if at < self.created_on {
            return Err(Error::validation(format!(
                "updated_on {} precedes created_on {}",
                format_timestamp(at),
                format_timestamp(self.created_on)
            )));
        }
        self.updated_on = at;
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: CardId) {
        self.id = Some(id);
    }
}

/// `<id> | <question> -> <answer> | <created_on> | <updated_on>`
impl fmt::Display for Flashcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}", id)?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            " | {} -> {} | {} | {}",
            self.question,
            self.answer,
            format_timestamp(self.created_on),
            format_timestamp(self.updated_on)
        )
    }
}

/// Current time at the precision timestamps are stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}
