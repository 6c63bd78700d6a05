//! # Quiz Error Types Module
//!
//! Errors raised while turning a condensed quiz draft into a Telegram quiz poll.
//! Parsing itself never fails; these errors describe why a draft cannot be
//! published and are reported back to the submitter together with the poll limits.

/// Custom error types for quiz submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// No question text was found in the submission
    EmptyQuestion,
    /// Fewer options than a poll accepts
    TooFewOptions { count: usize, min: usize },
    /// More options than a poll accepts
    TooManyOptions { count: usize, max: usize },
    /// An option line had no text after condensation
    EmptyOption { index: usize },
    /// Question longer than the poll allows
    QuestionTooLong { length: usize, max: usize },
    /// Option longer than the poll allows
    OptionTooLong { index: usize, length: usize, max: usize },
    /// Quiz polls need at least one option marked with `*`; the last marked one is used
    MissingCorrectOption,
    /// Correct option index does not point into the option list
    CorrectOptionOutOfRange { index: usize, count: usize },
    /// Telegram rejected or failed the request
    Telegram(String),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::EmptyQuestion => write!(f, "[QUIZ_QUESTION] Question text is empty"),
            QuizError::TooFewOptions { count, min } => write!(
                f,
                "[QUIZ_OPTIONS] Found {} option(s), at least {} are required",
                count, min
            ),
            QuizError::TooManyOptions { count, max } => write!(
                f,
                "[QUIZ_OPTIONS] Found {} options, at most {} are allowed",
                count, max
            ),
            QuizError::EmptyOption { index } => {
                write!(f, "[QUIZ_OPTIONS] Option {} has no text", option_label(*index))
            }
            QuizError::QuestionTooLong { length, max } => write!(
                f,
                "[QUIZ_QUESTION] Question is {} characters long, the limit is {}",
                length, max
            ),
            QuizError::OptionTooLong { index, length, max } => write!(
                f,
                "[QUIZ_OPTIONS] Option {} is {} characters long, the limit is {}",
                option_label(*index),
                length,
                max
            ),
            QuizError::MissingCorrectOption => write!(
                f,
                "[QUIZ_ANSWER] No correct option marked, end one option line with *"
            ),
            QuizError::CorrectOptionOutOfRange { index, count } => write!(
                f,
                "[QUIZ_ANSWER] Correct option index {} is outside the {} available options",
                index, count
            ),
            QuizError::Telegram(msg) => write!(f, "[TELEGRAM] Poll request failed: {}", msg),
        }
    }
}

impl std::error::Error for QuizError {}

impl From<teloxide::RequestError> for QuizError {
    fn from(err: teloxide::RequestError) -> Self {
        QuizError::Telegram(err.to_string())
    }
}

impl From<anyhow::Error> for QuizError {
    fn from(err: anyhow::Error) -> Self {
        QuizError::Telegram(err.to_string())
    }
}

fn option_label(index: usize) -> String {
    format!("{})", crate::quiz::option_letter(index))
}
