//! # UPSC Quiz Telegram Bot
//!
//! A Telegram bot that turns freeform multi-line messages into quiz polls,
//! condensing questions and options to the poll limits with domain-specific
//! abbreviations before falling back to truncation.

pub mod abbreviations;
pub mod bot;
pub mod config;
pub mod errors;
pub mod localization;
pub mod observability;
pub mod observability_config;
pub mod poll;
pub mod quiz;
pub mod quiz_errors;

// Re-export types for easier access
pub use abbreviations::{load_abbreviation_table, AbbreviationDomain, AbbreviationTable};
pub use poll::{PollKind, PollRequest};
pub use quiz::{parse_quiz, render_preview, smart_condense, QuizDraft};
pub use quiz_errors::QuizError;
