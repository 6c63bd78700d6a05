//! Bot module for handling Telegram interactions
//!
//! - `command_handlers`: /start, /help, /limits
//! - `message_handler`: quiz submissions and dispatch of incoming messages
//! - `ui_builder`: formats instructions, limits and error replies

pub mod command_handlers;
pub mod message_handler;
pub mod ui_builder;

use crate::localization::LocalizationManager;
use teloxide::Bot;

/// Common context for bot handlers containing shared dependencies
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub localization: &'a LocalizationManager,
    pub language_code: Option<&'a str>,
}

// Re-export main handler functions for use in main.rs
pub use command_handlers::{parse_command, BotCommand};
pub use message_handler::{message_handler, publish_quiz, send_quiz_poll};
pub use ui_builder::{format_instructions, format_limits, format_submission_error};
