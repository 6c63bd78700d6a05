//! Command Handlers module for processing bot commands

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use super::ui_builder::{format_instructions, format_limits};
use super::HandlerContext;
use crate::localization::t_lang;
use crate::observability;

/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Limits,
    Unknown,
}

impl BotCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Limits => "limits",
            BotCommand::Unknown => "unknown",
        }
    }
}

/// Recognise a command message. Returns `None` for ordinary text.
///
/// Accepts the `/command@BotName` form used in group chats and ignores arguments.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let first = text.trim_start().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);

    Some(match name.to_lowercase().as_str() {
        "start" => BotCommand::Start,
        "help" => BotCommand::Help,
        "limits" => BotCommand::Limits,
        _ => BotCommand::Unknown,
    })
}

/// Dispatch a recognised command
pub async fn handle_command(ctx: &HandlerContext<'_>, msg: &Message, command: BotCommand) -> Result<()> {
    debug!(chat_id = %msg.chat.id, command = command.as_str(), "Handling command");
    observability::record_command_metrics(command.as_str());

    match command {
        BotCommand::Start | BotCommand::Help => handle_start_command(ctx, msg).await,
        BotCommand::Limits => handle_limits_command(ctx, msg).await,
        BotCommand::Unknown => handle_unknown_command(ctx, msg).await,
    }
}

/// Handle the /start command
pub async fn handle_start_command(ctx: &HandlerContext<'_>, msg: &Message) -> Result<()> {
    let instructions = format_instructions(ctx.localization, ctx.language_code);
    ctx.bot.send_message(msg.chat.id, instructions).await?;
    Ok(())
}

/// Handle the /limits command
pub async fn handle_limits_command(ctx: &HandlerContext<'_>, msg: &Message) -> Result<()> {
    let limits = format_limits(ctx.localization, ctx.language_code);
    ctx.bot.send_message(msg.chat.id, limits).await?;
    Ok(())
}

async fn handle_unknown_command(ctx: &HandlerContext<'_>, msg: &Message) -> Result<()> {
    ctx.bot
        .send_message(
            msg.chat.id,
            t_lang(ctx.localization, "unknown-command", ctx.language_code),
        )
        .await?;
    Ok(())
}
