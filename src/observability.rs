//! Observability module for centralized metrics and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels (pretty or JSON)
//! - Metrics collection and Prometheus export
//! - Health check endpoints for monitoring
//! - Metric recording helpers for the quiz pipeline

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::prelude::*;

use crate::abbreviations::AbbreviationTable;
use crate::observability_config::ObservabilityConfig;

/// Initialize logging, and metrics export when enabled
pub async fn init_observability_with_config(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    if config.enable_metrics_export {
        let metrics_handle = init_metrics()?;
        start_metrics_server(metrics_handle, config.metrics_port).await?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = config.enable_metrics_export,
        metrics_port = %config.metrics_port,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("upsc_quiz_bot={}", config.log_level.to_lowercase()).parse()?)
        .add_directive("teloxide=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Serve `/metrics`, `/health/live` and `/health/ready` in a background task
pub async fn start_metrics_server(metrics_handle: PrometheusHandle, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Metrics server listening");

    tokio::spawn(accept_loop(listener, metrics_handle));
    Ok(())
}

async fn accept_loop(listener: TcpListener, metrics_handle: PrometheusHandle) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Metrics listener failed to accept");
                continue;
            }
        };
        tokio::spawn(serve_scrape(stream, peer, metrics_handle.clone()));
    }
}

async fn serve_scrape(stream: TcpStream, peer: SocketAddr, metrics_handle: PrometheusHandle) {
    let service = service_fn(move |req: Request<Incoming>| {
        let response = metrics_route(req.method(), req.uri().path(), &metrics_handle);
        async move { Ok::<_, Infallible>(response) }
    });

    if let Err(e) = http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        tracing::debug!(%peer, error = %e, "Metrics connection closed with error");
    }
}

/// Build the response for one request to the metrics endpoint
pub fn metrics_route(method: &Method, path: &str, metrics_handle: &PrometheusHandle) -> Response<String> {
    let (status, body) = match (method, path) {
        (&Method::GET, "/metrics") => (StatusCode::OK, metrics_handle.render()),
        (&Method::GET, "/health/live" | "/health/ready") => (StatusCode::OK, "OK".to_string()),
        (&Method::GET, _) => (StatusCode::NOT_FOUND, "Not Found".to_string()),
        _ => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string()),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

/// Outcome of one quiz submission, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Preview and poll were both sent
    PollCreated,
    /// The draft broke a poll limit
    Rejected,
    /// Telegram refused or the request failed
    TelegramError,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::PollCreated => "poll_created",
            SubmissionOutcome::Rejected => "rejected",
            SubmissionOutcome::TelegramError => "telegram_error",
        }
    }
}

/// Record quiz submission metrics
pub fn record_submission_metrics(outcome: SubmissionOutcome, duration: Duration) {
    metrics::counter!("quiz_submissions_total", "result" => outcome.as_str()).increment(1);
    metrics::histogram!("quiz_submission_duration_seconds").record(duration.as_secs_f64());
}

/// Record how much condensation a submission needed
pub fn record_condensation_metrics(substitutions: usize, truncated_fields: usize) {
    metrics::counter!("abbreviation_substitutions_total").increment(substitutions as u64);
    metrics::counter!("condensation_truncations_total").increment(truncated_fields as u64);
}

/// Record a handled bot command
pub fn record_command_metrics(command: &'static str) {
    metrics::counter!("bot_commands_total", "command" => command).increment(1);
}

/// Record the size of the loaded abbreviation table
pub fn record_abbreviation_table_metrics(table: &AbbreviationTable) {
    metrics::gauge!("abbreviation_domains").set(table.domain_count() as f64);
    metrics::gauge!("abbreviation_phrases").set(table.phrase_count() as f64);
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, chat_id: i64) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        chat_id = chat_id,
        component = "telegram"
    )
}
