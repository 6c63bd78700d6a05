//! # Unified Application Configuration
//!
//! This module consolidates all application settings into a single
//! configuration object loaded from environment variables (a `.env` file is
//! honoured through dotenvy in `main`) and validated at startup.

use crate::abbreviations::DEFAULT_ABBREVIATIONS_PATH;
use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Bot-specific configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Where the abbreviation dictionary lives
#[derive(Debug, Clone, PartialEq)]
pub struct AbbreviationConfig {
    pub path: PathBuf,
}

impl Default for AbbreviationConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ABBREVIATIONS_PATH),
        }
    }
}

impl AbbreviationConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::Config(
                "ABBREVIATIONS_PATH cannot be empty".to_string(),
            ));
        }
        // Loading degrades to an empty table, so this must not stop the bot
        if self.path.is_dir() {
            warn!(
                path = %self.path.display(),
                "ABBREVIATIONS_PATH is a directory, abbreviations will be disabled"
            );
        }
        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub abbreviations: AbbreviationConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.bot.token = lookup("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.http_timeout_secs = lookup("HTTP_CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("HTTP_CLIENT_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        if let Some(path) = lookup("ABBREVIATIONS_PATH") {
            config.abbreviations.path = PathBuf::from(path);
        }

        config.observability = ObservabilityConfig::from_lookup(&lookup);

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.abbreviations.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], http_timeout_secs={}, abbreviations_path={}, environment={}, metrics_enabled={}",
            self.bot.http_timeout_secs,
            self.abbreviations.path.display(),
            self.observability.environment,
            self.observability.enable_metrics_export
        )
    }
}
