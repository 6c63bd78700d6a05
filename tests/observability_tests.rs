//! # Observability Tests Module
//!
//! Metrics emitted for quiz submissions, rendered through a local Prometheus
//! recorder, plus environment-driven observability settings.

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::time::Duration;
    use upsc_quiz_bot::abbreviations::AbbreviationTable;
    use upsc_quiz_bot::observability::{self, SubmissionOutcome};
    use upsc_quiz_bot::observability_config::ObservabilityConfig;

    /// Render everything recorded inside `f` in Prometheus text format
    fn render_with_local_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn test_submission_metrics_are_labelled_by_outcome() {
        let output = render_with_local_recorder(|| {
            observability::record_submission_metrics(
                SubmissionOutcome::PollCreated,
                Duration::from_millis(120),
            );
            observability::record_submission_metrics(
                SubmissionOutcome::Rejected,
                Duration::from_millis(4),
            );
        });

        assert!(output.contains("quiz_submissions_total{result=\"poll_created\"} 1"));
        assert!(output.contains("quiz_submissions_total{result=\"rejected\"} 1"));
        assert!(output.contains("quiz_submission_duration_seconds"));
    }

    #[test]
    fn test_condensation_and_command_metrics() {
        let output = render_with_local_recorder(|| {
            observability::record_condensation_metrics(3, 1);
            observability::record_command_metrics("limits");
        });

        assert!(output.contains("abbreviation_substitutions_total 3"));
        assert!(output.contains("condensation_truncations_total 1"));
        assert!(output.contains("bot_commands_total{command=\"limits\"} 1"));
    }

    #[test]
    fn test_abbreviation_table_gauges() {
        let table = AbbreviationTable::builtin_defaults().unwrap();
        let phrases = table.phrase_count();
        let domains = table.domain_count();

        let output = render_with_local_recorder(|| {
            observability::record_abbreviation_table_metrics(&table);
        });

        assert!(output.contains(&format!("abbreviation_domains {}", domains)));
        assert!(output.contains(&format!("abbreviation_phrases {}", phrases)));
    }

    #[test]
    fn test_observability_config_from_lookup() {
        let config = ObservabilityConfig::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("production".to_string()),
            "METRICS_PORT" => Some("9100".to_string()),
            "ENABLE_METRICS_EXPORT" => Some("TRUE".to_string()),
            "LOG_FORMAT" => Some("pretty".to_string()),
            _ => None,
        });

        assert!(config.is_production());
        assert_eq!(config.metrics_port, 9100);
        assert!(config.enable_metrics_export);
        assert!(config.use_pretty_logs());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_telegram_span_is_created() {
        let span = observability::telegram_span("send_poll", 42);
        let _guard = span.enter();
    }
}
