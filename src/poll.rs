//! Poll request built from a condensed quiz draft.
//!
//! [`PollRequest::check_platform_limits`] reproduces the checks Telegram
//! applies to quiz polls so a broken submission is reported before any
//! network call is made.

use serde::{Deserialize, Serialize};

use crate::quiz::{QuizDraft, POLL_MAX_OPTIONS, POLL_OPTION_MAX_LENGTH, POLL_QUESTION_MAX_LENGTH};
use crate::quiz_errors::QuizError;

/// Minimum number of options Telegram accepts for a poll
pub const POLL_MIN_OPTIONS: usize = 2;

/// Kind of poll the bot creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PollKind {
    /// Single correct answer, revealed after voting
    #[default]
    Quiz,
}

/// Everything the poll-creation call needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    pub question: String,
    pub options: Vec<String>,
    pub kind: PollKind,
    pub correct_option_id: Option<usize>,
    pub explanation: Option<String>,
    pub is_anonymous: bool,
}

impl PollRequest {
    /// Map a draft onto an anonymous quiz poll
    pub fn from_draft(draft: &QuizDraft) -> Self {
        Self {
            question: draft.question_text.clone(),
            options: draft.options.clone(),
            kind: PollKind::Quiz,
            correct_option_id: draft.correct_option_index,
            explanation: draft.explanation.clone(),
            is_anonymous: true,
        }
    }

    /// Reject requests Telegram would refuse for a quiz poll
    pub fn check_platform_limits(&self) -> Result<(), QuizError> {
        if self.question.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }

        let question_length = self.question.chars().count();
        if question_length > POLL_QUESTION_MAX_LENGTH {
            return Err(QuizError::QuestionTooLong {
                length: question_length,
                max: POLL_QUESTION_MAX_LENGTH,
            });
        }

        if self.options.len() < POLL_MIN_OPTIONS {
            return Err(QuizError::TooFewOptions {
                count: self.options.len(),
                min: POLL_MIN_OPTIONS,
            });
        }

        if self.options.len() > POLL_MAX_OPTIONS {
            return Err(QuizError::TooManyOptions {
                count: self.options.len(),
                max: POLL_MAX_OPTIONS,
            });
        }

        for (index, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuizError::EmptyOption { index });
            }
            let length = option.chars().count();
            if length > POLL_OPTION_MAX_LENGTH {
                return Err(QuizError::OptionTooLong {
                    index,
                    length,
                    max: POLL_OPTION_MAX_LENGTH,
                });
            }
        }

        match self.correct_option_id {
            None => Err(QuizError::MissingCorrectOption),
            Some(index) if index >= self.options.len() => Err(QuizError::CorrectOptionOutOfRange {
                index,
                count: self.options.len(),
            }),
            Some(_) => Ok(()),
        }
    }
}

impl From<&QuizDraft> for PollRequest {
    fn from(draft: &QuizDraft) -> Self {
        Self::from_draft(draft)
    }
}
