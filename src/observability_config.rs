//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics export.

use std::env;

use crate::errors::{AppError, AppResult};

/// Observability configuration for different environments
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Prometheus metrics endpoint port
    pub metrics_port: u16,
    /// Log level for the bot's own targets
    pub log_level: String,
    /// Log output format, `pretty` or `json`
    pub log_format: String,
    /// Whether to serve the metrics endpoint
    pub enable_metrics_export: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            metrics_port: 9090,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            enable_metrics_export: false,
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_port: lookup("METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT").unwrap_or(defaults.log_format),
            enable_metrics_export: lookup("ENABLE_METRICS_EXPORT")
                .and_then(|v| v.to_lowercase().parse().ok())
                .unwrap_or(defaults.enable_metrics_export),
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Pretty logs in development or when explicitly requested
    pub fn use_pretty_logs(&self) -> bool {
        self.is_development() || self.log_format == "pretty"
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "LOG_LEVEL '{}' must be one of {}",
                self.log_level,
                LEVELS.join(", ")
            )));
        }

        if self.log_format != "pretty" && self.log_format != "json" {
            return Err(AppError::Config(format!(
                "LOG_FORMAT '{}' must be 'pretty' or 'json'",
                self.log_format
            )));
        }

        if self.enable_metrics_export && self.metrics_port == 0 {
            return Err(AppError::Config(
                "METRICS_PORT cannot be 0 when metrics export is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
