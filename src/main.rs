use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;
use upsc_quiz_bot::abbreviations::load_abbreviation_table;
use upsc_quiz_bot::bot;
use upsc_quiz_bot::config::AppConfig;
use upsc_quiz_bot::errors::error_logging;
use upsc_quiz_bot::localization;
use upsc_quiz_bot::observability;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    if let Err(e) = config.validate() {
        error_logging::log_config_error(&e, "startup", "validate");
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    observability::init_observability_with_config(&config.observability).await?;
    info!("{}", config.summary());

    // Loaded once; handlers only ever read it
    let table = Arc::new(load_abbreviation_table(&config.abbreviations.path));
    observability::record_abbreviation_table_metrics(&table);
    if table.is_empty() {
        info!("Abbreviation table is empty, submissions will only be truncated");
    }

    let localization_manager = localization::create_localization_manager()?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    info!(
        http_timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let table = Arc::clone(&table);
        let localization = Arc::clone(&localization_manager);
        move |bot: Bot, msg: Message| {
            let table = Arc::clone(&table);
            let localization = Arc::clone(&localization);
            async move { bot::message_handler(bot, msg, table, localization).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
