//! UI Builder module for formatting bot replies

use std::fmt::Display;

// Import localization
use crate::localization::{t_args_lang, t_lang, LocalizationManager};

// Import quiz limits
use crate::quiz::{FORMAT_EXAMPLE, POLL_MAX_OPTIONS, POLL_OPTION_MAX_LENGTH, POLL_QUESTION_MAX_LENGTH};

/// Instructions sent for /start and /help: welcome, limits, automatic steps and a format example
pub fn format_instructions(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    let option_max = POLL_OPTION_MAX_LENGTH.to_string();
    let question_max = POLL_QUESTION_MAX_LENGTH.to_string();
    let options_max = POLL_MAX_OPTIONS.to_string();

    let limits = [
        t_lang(localization, "welcome-limits-intro", language_code),
        t_args_lang(localization, "welcome-option-limit", &[("max", option_max.as_str())], language_code),
        t_args_lang(localization, "welcome-question-limit", &[("max", question_max.as_str())], language_code),
        t_args_lang(localization, "welcome-options-limit", &[("max", options_max.as_str())], language_code),
    ]
    .join("\n");

    let automatic = [
        t_lang(localization, "welcome-auto-intro", language_code),
        t_lang(localization, "welcome-auto-abbreviate", language_code),
        t_lang(localization, "welcome-auto-condense", language_code),
        t_lang(localization, "welcome-auto-preview", language_code),
    ]
    .join("\n");

    let example = format!(
        "{}\n{}",
        t_lang(localization, "welcome-format-intro", language_code),
        FORMAT_EXAMPLE
    );

    [
        t_lang(localization, "welcome-title", language_code),
        limits,
        automatic,
        example,
    ]
    .join("\n\n")
}

/// The three Telegram poll limits as a short block
pub fn format_limits(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    let option_max = POLL_OPTION_MAX_LENGTH.to_string();
    let question_max = POLL_QUESTION_MAX_LENGTH.to_string();
    let options_max = POLL_MAX_OPTIONS.to_string();

    [
        t_lang(localization, "limits-title", language_code),
        t_args_lang(localization, "limit-option", &[("max", option_max.as_str())], language_code),
        t_args_lang(localization, "limit-question", &[("max", question_max.as_str())], language_code),
        t_args_lang(localization, "limit-options", &[("max", options_max.as_str())], language_code),
    ]
    .join("\n")
}

/// Error text followed by the poll limits reminder
pub fn format_submission_error(
    localization: &LocalizationManager,
    error: &dyn Display,
    language_code: Option<&str>,
) -> String {
    let error_text = error.to_string();
    format!(
        "{}\n\n{}",
        t_args_lang(localization, "error-prefix", &[("error", error_text.as_str())], language_code),
        format_limits(localization, language_code)
    )
}
