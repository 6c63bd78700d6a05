//! # Quiz Parsing and Condensation
//!
//! Turns one freeform Telegram message into a [`QuizDraft`]:
//!
//! ```text
//! Which city is the capital of India?     <- question fragment(s)
//! a) Mumbai                                <- option lines (a-d)
//! b) Delhi*                                <- trailing * marks the answer
//! exp: Delhi is the capital.               <- explanation, kept verbatim
//! ```
//!
//! Question and options are condensed to the Telegram poll limits: the
//! abbreviation table is applied first, truncation with an ellipsis is the
//! last resort.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::abbreviations::AbbreviationTable;

/// Maximum characters in a single poll option
pub const POLL_OPTION_MAX_LENGTH: usize = 100;
/// Maximum characters in a poll question
pub const POLL_QUESTION_MAX_LENGTH: usize = 300;
/// Maximum number of options in a poll
pub const POLL_MAX_OPTIONS: usize = 10;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";
const ELLIPSIS_LEN: usize = 3;

const CORRECT_MARKER: char = '*';
const EXPLANATION_PREFIX: &str = "exp:";

/// Example submission shown in the instructions
pub const FORMAT_EXAMPLE: &str = "Your question here?\n\
a) First option\n\
b) Second option\n\
c) Correct option*\n\
d) Fourth option\n\
exp: Your explanation";

lazy_static! {
    static ref OPTION_LINE: Regex =
        Regex::new(r"^[a-d]\)(?P<content>.*)$").expect("Option line pattern should be valid");
}

/// How text over the limit is cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Keep `max - 3` characters and append `...`
    #[default]
    Ellipsis,
    /// Keep exactly `max` characters
    Exact,
}

/// The parsed, condensed form of one submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizDraft {
    /// Question fragments joined with spaces, at most [`POLL_QUESTION_MAX_LENGTH`] characters
    pub question_text: String,
    /// Options in source order, each at most [`POLL_OPTION_MAX_LENGTH`] characters
    pub options: Vec<String>,
    /// 0-based index of the option marked with `*`
    pub correct_option_index: Option<usize>,
    /// Text of the last `exp:` line, not condensed
    pub explanation: Option<String>,
}

/// A draft plus what condensation had to do to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub draft: QuizDraft,
    /// Abbreviation substitutions over all condensed fields
    pub substitutions: usize,
    /// Fields that still had to be truncated after abbreviation
    pub truncated_fields: usize,
}

/// Result of condensing a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensed {
    pub text: String,
    pub substitutions: usize,
    pub truncated: bool,
}

/// Classification of one trimmed, non-blank input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Option { content: &'a str, is_correct: bool },
    Explanation(&'a str),
    QuestionFragment(&'a str),
}

/// Cut `text` to at most `max_length` characters.
///
/// With [`Truncation::Ellipsis`] and a limit too small to hold the marker,
/// the text is cut to exactly `max_length` characters instead.
pub fn truncate_text(text: &str, max_length: usize, mode: Truncation) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    match mode {
        Truncation::Ellipsis if max_length >= ELLIPSIS_LEN => {
            let mut truncated: String = text.chars().take(max_length - ELLIPSIS_LEN).collect();
            truncated.push_str(ELLIPSIS);
            truncated
        }
        _ => text.chars().take(max_length).collect(),
    }
}

/// Abbreviate, then truncate if still over `max_length`
pub fn condense(
    text: &str,
    max_length: usize,
    table: &AbbreviationTable,
    mode: Truncation,
) -> Condensed {
    let (abbreviated, substitutions) = table.apply_counted(text);
    let length = abbreviated.chars().count();

    if length > max_length {
        trace!(length, max_length, "Truncating condensed text");
        Condensed {
            text: truncate_text(&abbreviated, max_length, mode),
            substitutions,
            truncated: true,
        }
    } else {
        Condensed {
            text: abbreviated,
            substitutions,
            truncated: false,
        }
    }
}

/// Condense with the default ellipsis truncation
pub fn smart_condense(text: &str, max_length: usize, table: &AbbreviationTable) -> String {
    condense(text, max_length, table, Truncation::Ellipsis).text
}

/// Classify a trimmed line. Option lines win over `exp:` lines.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = OPTION_LINE.captures(line) {
        let content = caps.name("content").map_or("", |m| m.as_str()).trim();
        return match content.strip_suffix(CORRECT_MARKER) {
            Some(stripped) => LineKind::Option {
                content: stripped.trim(),
                is_correct: true,
            },
            None => LineKind::Option {
                content,
                is_correct: false,
            },
        };
    }

    if let Some(explanation) = line.strip_prefix(EXPLANATION_PREFIX) {
        return LineKind::Explanation(explanation.trim());
    }

    LineKind::QuestionFragment(line)
}

/// Parse and condense a raw submission
pub fn parse_quiz(input: &str, table: &AbbreviationTable) -> QuizDraft {
    parse_quiz_detailed(input, table).draft
}

/// Parse and condense a raw submission, reporting condensation statistics
pub fn parse_quiz_detailed(input: &str, table: &AbbreviationTable) -> ParseReport {
    let mut question_lines: Vec<&str> = Vec::new();
    let mut options: Vec<String> = Vec::new();
    let mut correct_option_index = None;
    let mut explanation = None;
    let mut substitutions = 0;
    let mut truncated_fields = 0;

    for line in input.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        match classify_line(line) {
            LineKind::Option {
                content,
                is_correct,
            } => {
                if is_correct {
                    correct_option_index = Some(options.len());
                }
                let condensed = condense(content, POLL_OPTION_MAX_LENGTH, table, Truncation::Ellipsis);
                substitutions += condensed.substitutions;
                truncated_fields += usize::from(condensed.truncated);
                options.push(condensed.text);
            }
            LineKind::Explanation(text) => explanation = Some(text.to_string()),
            LineKind::QuestionFragment(text) => question_lines.push(text),
        }
    }

    let question = condense(
        &question_lines.join(" "),
        POLL_QUESTION_MAX_LENGTH,
        table,
        Truncation::Ellipsis,
    );
    substitutions += question.substitutions;
    truncated_fields += usize::from(question.truncated);

    debug!(
        question_length = question.text.chars().count(),
        option_count = options.len(),
        correct_option = ?correct_option_index,
        has_explanation = explanation.is_some(),
        substitutions,
        truncated_fields,
        "Parsed quiz submission"
    );

    ParseReport {
        draft: QuizDraft {
            question_text: question.text,
            options,
            correct_option_index,
            explanation,
        },
        substitutions,
        truncated_fields,
    }
}

/// Letter label for an option position: 0 → 'a', 1 → 'b', ...
pub fn option_letter(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(u32::from(b'a')))
        .and_then(char::from_u32)
        .unwrap_or('?')
}

/// Human-readable preview sent before the poll is created
pub fn render_preview(draft: &QuizDraft) -> String {
    let mut preview = format!(
        "Preview of condensed content:\n\nQuestion: {}\n\nOptions:\n",
        draft.question_text
    );
    for (i, option) in draft.options.iter().enumerate() {
        preview.push_str(&format!("{}) {}\n", option_letter(i), option));
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abbreviations::AbbreviationDomain;

    fn no_abbreviations() -> AbbreviationTable {
        AbbreviationTable::empty()
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_text("short", 10, Truncation::Ellipsis), "short");
        assert_eq!(truncate_text("exactly10!", 10, Truncation::Ellipsis), "exactly10!");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        let result = truncate_text("abcdefghijkl", 10, Truncation::Ellipsis);
        assert_eq!(result, "abcdefg...");
        assert_eq!(result.chars().count(), 10);
    }

    #[test]
    fn test_truncate_exact() {
        assert_eq!(truncate_text("abcdefghijkl", 10, Truncation::Exact), "abcdefghij");
    }

    #[test]
    fn test_truncate_tiny_limit_never_exceeds() {
        assert_eq!(truncate_text("abcdef", 2, Truncation::Ellipsis), "ab");
        assert_eq!(truncate_text("abcdef", 0, Truncation::Ellipsis), "");
        assert_eq!(truncate_text("abcdef", 3, Truncation::Ellipsis), "...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "भारत की राजधानी क्या है";
        let result = truncate_text(text, 8, Truncation::Ellipsis);
        assert_eq!(result.chars().count(), 8);
        assert!(result.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_condense_prefers_abbreviation() {
        let table = AbbreviationTable::from_domains(vec![AbbreviationDomain::with_entries(
            "bodies",
            &[("Union Public Service Commission", "UPSC")],
        )]);
        let condensed = condense(
            "Union Public Service Commission exam",
            10,
            &table,
            Truncation::Ellipsis,
        );
        assert_eq!(condensed.text, "UPSC exam");
        assert_eq!(condensed.substitutions, 1);
        assert!(!condensed.truncated);
    }

    #[test]
    fn test_condense_reports_truncation() {
        let condensed = condense(&"x".repeat(150), 100, &no_abbreviations(), Truncation::Ellipsis);
        assert!(condensed.truncated);
        assert_eq!(condensed.text.chars().count(), 100);
    }

    #[test]
    fn test_classify_option_lines() {
        assert_eq!(
            classify_line("a) Delhi"),
            LineKind::Option {
                content: "Delhi",
                is_correct: false
            }
        );
        assert_eq!(
            classify_line("d)Mumbai *"),
            LineKind::Option {
                content: "Mumbai",
                is_correct: true
            }
        );
    }

    #[test]
    fn test_classify_only_a_to_d_lowercase() {
        assert_eq!(classify_line("e) Fifth"), LineKind::QuestionFragment("e) Fifth"));
        assert_eq!(classify_line("A) Upper"), LineKind::QuestionFragment("A) Upper"));
        assert_eq!(classify_line("a. Dot"), LineKind::QuestionFragment("a. Dot"));
    }

    #[test]
    fn test_classify_explanation() {
        assert_eq!(classify_line("exp:  Because  "), LineKind::Explanation("Because"));
        assert_eq!(classify_line("Exp: no"), LineKind::QuestionFragment("Exp: no"));
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        assert_eq!(
            classify_line("b) Star**"),
            LineKind::Option {
                content: "Star*",
                is_correct: true
            }
        );
    }

    #[test]
    fn test_blank_lines_and_whitespace_ignored() {
        let draft = parse_quiz("\n   \r\nWhat?\r\n\n a) Yes \n", &no_abbreviations());
        assert_eq!(draft.question_text, "What?");
        assert_eq!(draft.options, vec!["Yes".to_string()]);
    }

    #[test]
    fn test_last_explanation_wins() {
        let draft = parse_quiz("Q\nexp: first\nexp: second", &no_abbreviations());
        assert_eq!(draft.explanation.as_deref(), Some("second"));
    }

    #[test]
    fn test_explanation_not_condensed() {
        let table = AbbreviationTable::from_domains(vec![AbbreviationDomain::with_entries(
            "bodies",
            &[("Reserve Bank of India", "RBI")],
        )]);
        let long = "y".repeat(400);
        let draft = parse_quiz(
            &format!("Q\nexp: Reserve Bank of India {}", long),
            &table,
        );
        let explanation = draft.explanation.unwrap();
        assert!(explanation.starts_with("Reserve Bank of India"));
        assert!(explanation.chars().count() > POLL_QUESTION_MAX_LENGTH);
    }

    #[test]
    fn test_last_marked_option_wins() {
        let draft = parse_quiz("Q\na) one*\nb) two*\nc) three", &no_abbreviations());
        assert_eq!(draft.correct_option_index, Some(1));
    }

    #[test]
    fn test_empty_input_gives_empty_draft() {
        let draft = parse_quiz("", &no_abbreviations());
        assert_eq!(draft, QuizDraft::default());
    }

    #[test]
    fn test_parse_report_counts() {
        let table = AbbreviationTable::from_domains(vec![AbbreviationDomain::with_entries(
            "economy",
            &[("Gross Domestic Product", "GDP")],
        )]);
        let input = format!(
            "What measures Gross Domestic Product?\na) Gross Domestic Product\nb) {}",
            "z".repeat(120)
        );
        let report = parse_quiz_detailed(&input, &table);
        assert_eq!(report.substitutions, 2);
        assert_eq!(report.truncated_fields, 1);
        assert_eq!(report.draft.options[0], "GDP");
    }

    #[test]
    fn test_option_letters() {
        assert_eq!(option_letter(0), 'a');
        assert_eq!(option_letter(3), 'd');
        assert_eq!(option_letter(9), 'j');
    }

    #[test]
    fn test_format_example_parses() {
        let draft = parse_quiz(FORMAT_EXAMPLE, &no_abbreviations());
        assert_eq!(draft.question_text, "Your question here?");
        assert_eq!(draft.options.len(), 4);
        assert_eq!(draft.correct_option_index, Some(2));
        assert_eq!(draft.explanation.as_deref(), Some("Your explanation"));
    }
}
