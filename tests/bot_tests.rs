use std::collections::HashMap;
use upsc_quiz_bot::abbreviations::AbbreviationTable;
use upsc_quiz_bot::bot::{parse_command, BotCommand};
use upsc_quiz_bot::config::AppConfig;
use upsc_quiz_bot::errors::AppError;
use upsc_quiz_bot::poll::{PollKind, PollRequest};
use upsc_quiz_bot::quiz::{parse_quiz, QuizDraft};
use upsc_quiz_bot::QuizError;

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOKEN: &str = "123456789:AAFakeTokenForTestingPurposes1234567890";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    /// Test that a full environment produces a valid configuration
    #[test]
    fn test_config_from_environment() {
        let config = AppConfig::from_lookup(env(&[
            ("TELEGRAM_BOT_TOKEN", VALID_TOKEN),
            ("HTTP_CLIENT_TIMEOUT_SECS", "45"),
            ("ABBREVIATIONS_PATH", "/tmp/upsc.json"),
            ("ENVIRONMENT", "production"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.bot.http_timeout_secs, 45);
        assert_eq!(config.abbreviations.path.to_str(), Some("/tmp/upsc.json"));
        assert!(config.observability.is_production());
        assert!(config.validate().is_ok());
        assert!(!config.summary().contains(VALID_TOKEN));
    }

    /// Test that the bot refuses to start without a token
    #[test]
    fn test_missing_token_is_config_error() {
        let result = AppConfig::from_lookup(env(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    /// Test that malformed tokens fail validation
    #[test]
    fn test_malformed_token_fails_validation() {
        let config = AppConfig::from_lookup(env(&[("TELEGRAM_BOT_TOKEN", "not-a-token")])).unwrap();
        assert!(config.validate().is_err());
    }

    /// Test command routing for message texts
    #[test]
    fn test_message_routing() {
        assert_eq!(parse_command("/start"), Some(BotCommand::Start));
        assert_eq!(parse_command("  /limits@UpscQuizBot"), Some(BotCommand::Limits));
        assert_eq!(parse_command("/quiz"), Some(BotCommand::Unknown));
        assert_eq!(parse_command("Which city?\na) A\nb) B*"), None);
    }

    /// Test the poll request produced for a well-formed submission
    #[test]
    fn test_poll_request_from_submission() {
        let table = AbbreviationTable::builtin_defaults().unwrap();
        let draft = parse_quiz(
            "Who appoints the Comptroller and Auditor General?\n\
             a) Prime Minister\n\
             b) President*\n\
             c) Chief Justice\n\
             exp: Article 148",
            &table,
        );

        let request = PollRequest::from(&draft);

        assert_eq!(request.question, "Who appoints the CAG?");
        assert_eq!(request.options, vec!["PM", "President", "Chief Justice"]);
        assert_eq!(request.kind, PollKind::Quiz);
        assert_eq!(request.correct_option_id, Some(1));
        assert_eq!(request.explanation.as_deref(), Some("Article 148"));
        assert!(request.is_anonymous);
        assert!(request.check_platform_limits().is_ok());
    }

    /// Test that drafts Telegram would refuse are reported before sending
    #[test]
    fn test_rejected_submissions() {
        let table = AbbreviationTable::empty();

        let no_question = parse_quiz("a) A*\nb) B", &table);
        assert_eq!(
            PollRequest::from(&no_question).check_platform_limits(),
            Err(QuizError::EmptyQuestion)
        );

        let empty_option = parse_quiz("Q\na) *\nb) B", &table);
        assert_eq!(
            PollRequest::from(&empty_option).check_platform_limits(),
            Err(QuizError::EmptyOption { index: 0 })
        );

        let too_many = QuizDraft {
            question_text: "Q".to_string(),
            options: (0..11).map(|i| format!("option {}", i)).collect(),
            correct_option_index: Some(0),
            explanation: None,
        };
        assert_eq!(
            PollRequest::from(&too_many).check_platform_limits(),
            Err(QuizError::TooManyOptions { count: 11, max: 10 })
        );
    }

    /// Test that rejection messages name the offending option by letter
    #[test]
    fn test_rejection_message_uses_letters() {
        let error = QuizError::EmptyOption { index: 2 };
        assert!(error.to_string().contains("Option c)"));
    }
}
