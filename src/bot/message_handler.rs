//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use teloxide::prelude::*;
use teloxide::types::{InputPollOption, PollType};
use tracing::{debug, info, warn, Instrument};

use super::command_handlers::{handle_command, parse_command};
use super::ui_builder::format_submission_error;
use super::HandlerContext;
use crate::abbreviations::AbbreviationTable;
use crate::errors::error_logging;
use crate::localization::LocalizationManager;
use crate::observability::{self, SubmissionOutcome};
use crate::poll::{PollKind, PollRequest};
use crate::quiz::{parse_quiz_detailed, render_preview, QuizDraft};
use crate::quiz_errors::QuizError;

/// Entry point for every incoming message
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    table: Arc<AbbreviationTable>,
    localization: Arc<LocalizationManager>,
) -> Result<()> {
    let span = observability::telegram_span("message", msg.chat.id.0);

    async {
        let Some(text) = msg.text() else {
            debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
            return Ok(());
        };

        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref());

        let ctx = HandlerContext {
            bot: &bot,
            localization: &localization,
            language_code,
        };

        match parse_command(text) {
            Some(command) => handle_command(&ctx, &msg, command).await,
            None => handle_quiz_input(&ctx, msg.chat.id, text, &table).await,
        }
    }
    .instrument(span)
    .await
}

/// Parse, condense, preview and publish one quiz submission.
///
/// Any failure after parsing is reported back to the chat with the poll limits.
pub async fn handle_quiz_input(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    text: &str,
    table: &AbbreviationTable,
) -> Result<()> {
    let started = Instant::now();
    debug!(chat_id = %chat_id, message_length = text.len(), "Received quiz submission");

    let report = parse_quiz_detailed(text, table);
    observability::record_condensation_metrics(report.substitutions, report.truncated_fields);

    match publish_quiz(ctx.bot, chat_id, &report.draft).await {
        Ok(()) => {
            info!(
                chat_id = %chat_id,
                option_count = report.draft.options.len(),
                substitutions = report.substitutions,
                truncated_fields = report.truncated_fields,
                "Quiz poll created"
            );
            observability::record_submission_metrics(SubmissionOutcome::PollCreated, started.elapsed());
        }
        Err(e) => {
            let outcome = match e {
                QuizError::Telegram(_) => {
                    error_logging::log_submission_error(
                        &e,
                        "publish_quiz",
                        chat_id.0,
                        Some(report.draft.options.len()),
                        Some(report.draft.question_text.chars().count()),
                    );
                    SubmissionOutcome::TelegramError
                }
                _ => {
                    warn!(chat_id = %chat_id, error = %e, "Quiz submission rejected");
                    SubmissionOutcome::Rejected
                }
            };
            observability::record_submission_metrics(outcome, started.elapsed());

            ctx.bot
                .send_message(
                    chat_id,
                    format_submission_error(ctx.localization, &e, ctx.language_code),
                )
                .await?;
        }
    }

    Ok(())
}

/// Send the preview, then the quiz poll
pub async fn publish_quiz(bot: &Bot, chat_id: ChatId, draft: &QuizDraft) -> Result<(), QuizError> {
    bot.send_message(chat_id, render_preview(draft)).await?;

    let request = PollRequest::from_draft(draft);
    request.check_platform_limits()?;
    send_quiz_poll(bot, chat_id, &request).await?;
    Ok(())
}

/// Issue the sendPoll request
pub async fn send_quiz_poll(
    bot: &Bot,
    chat_id: ChatId,
    request: &PollRequest,
) -> Result<Message, QuizError> {
    let options = request
        .options
        .iter()
        .map(|option| InputPollOption::new(option.clone()));

    let poll_type = match request.kind {
        PollKind::Quiz => PollType::Quiz,
    };

    let mut poll = bot
        .send_poll(chat_id, request.question.clone(), options)
        .type_(poll_type)
        .is_anonymous(request.is_anonymous);

    if let Some(index) = request.correct_option_id {
        let id = u8::try_from(index).map_err(|_| QuizError::CorrectOptionOutOfRange {
            index,
            count: request.options.len(),
        })?;
        poll = poll.correct_option_id(id);
    }

    if let Some(explanation) = &request.explanation {
        poll = poll.explanation(explanation.clone());
    }

    Ok(poll.await?)
}
