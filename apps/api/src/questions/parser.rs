//! Question Parser: turns an LLM's loosely formatted completion into question records.
//!
//! Expected shape, one block per question, blocks separated by `---`:
//!
//! ```text
//! Question: What does the borrow checker enforce?
//! Type: Multiple Choice
//! Difficulty: Medium
//! Options: A. Aliasing XOR mutation B. Garbage collection C. Green threads D. Nothing
//! ```
//!
//! Parsing never fails. A block without a non-empty `Question:` line is dropped.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::prompts::QUESTION_SEPARATOR;

const QUESTION_PREFIX: &str = "Question:";
const TYPE_PREFIX: &str = "Type:";
const DIFFICULTY_PREFIX: &str = "Difficulty:";
const BASED_ON_PREFIX: &str = "Based On:";
const OPTIONS_PREFIX: &str = "Options:";

/// One generated question. `question` is always non-empty when produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub difficulty: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
}

/// Parser output with the count of blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuestions {
    pub questions: Vec<GeneratedQuestion>,
    pub skipped_segments: usize,
}

/// Parses `raw_text` into questions in the order the model produced them.
pub fn parse_questions(
    raw_text: &str,
    default_type: &str,
    default_difficulty: &str,
) -> Vec<GeneratedQuestion> {
    let parsed = parse_questions_with_report(raw_text, default_type, default_difficulty);
    if parsed.skipped_segments > 0 {
        debug!(
            "Dropped {} malformed question segment(s), kept {}",
            parsed.skipped_segments,
            parsed.questions.len()
        );
    }
    parsed.questions
}

pub fn parse_questions_with_report(
    raw_text: &str,
    default_type: &str,
    default_difficulty: &str,
) -> ParsedQuestions {
    let mut parsed = ParsedQuestions::default();

    for segment in raw_text
        .split(QUESTION_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        match parse_segment(segment, default_type, default_difficulty) {
            Some(question) => parsed.questions.push(question),
            None => parsed.skipped_segments += 1,
        }
    }

    parsed
}

fn parse_segment(
    segment: &str,
    default_type: &str,
    default_difficulty: &str,
) -> Option<GeneratedQuestion> {
    let mut question: Option<String> = None;
    let mut question_type = default_type.to_string();
    let mut difficulty = default_difficulty.to_string();
    let mut based_on: Option<String> = None;
    let mut options = Vec::new();

    for line in segment.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = line.strip_prefix(QUESTION_PREFIX) {
            let text = rest.trim();
            if question.is_none() && !text.is_empty() {
                question = Some(text.to_string());
            }
        } else if let Some(rest) = line.strip_prefix(TYPE_PREFIX) {
            question_type = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(DIFFICULTY_PREFIX) {
            difficulty = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(BASED_ON_PREFIX) {
            let text = rest.trim();
            based_on = (!text.is_empty()).then(|| text.to_string());
        } else if let Some(rest) = line.strip_prefix(OPTIONS_PREFIX) {
            options = split_options(rest.trim());
        }
    }

    Some(GeneratedQuestion {
        question: question?,
        question_type,
        difficulty,
        options,
        based_on,
    })
}

fn option_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"[A-D]\.").expect("static regex"))
}

fn option_marker_with_space() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"[A-D]\.\s*").expect("static regex"))
}

/// Splits `A. Red B. Green C. Blue` before each letter marker, keeping the letters.
///
/// When that leaves a single piece that still contains `B.`, falls back to
/// splitting on the markers themselves, which drops the letters.
fn split_options(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for marker in option_marker().find_iter(text) {
        if marker.start() > start {
            pieces.push(&text[start..marker.start()]);
        }
        start = marker.start();
    }
    pieces.push(&text[start..]);

    let options: Vec<String> = pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if options.len() == 1 && options[0].contains("B.") {
        return option_marker_with_space()
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    const MCQ_OUTPUT: &str = "Question: Which keyword declares an immutable binding?
Type: Multiple Choice
Difficulty: Easy
Options: A. let B. mut C. static mut D. var
---
Question: What does `?` do on a Result?
Type: Multiple Choice
Difficulty: Medium
Options: A. Panics B. Propagates the error C. Ignores it D. Logs it
---
";

    #[test]
    fn test_parses_well_formed_blocks_in_order() {
        let questions = parse_questions(MCQ_OUTPUT, "Multiple Choice", "Medium");
        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0].question,
            "Which keyword declares an immutable binding?"
        );
        assert_eq!(questions[0].difficulty, "Easy");
        assert_eq!(questions[1].question, "What does `?` do on a Result?");
        assert_eq!(questions[1].options.len(), 4);
        assert_eq!(questions[1].options[1], "B. Propagates the error");
        assert_eq!(questions[1].based_on, None);
    }

    #[test]
    fn test_malformed_segment_does_not_block_neighbours() {
        let raw = "Question: A?\nType: X\n---\nType: Y\n---\nQuestion: B?\nType: Z";
        let parsed = parse_questions_with_report(raw, "T", "D");

        let texts: Vec<_> = parsed.questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["A?", "B?"]);
        assert_eq!(parsed.questions[0].question_type, "X");
        assert_eq!(parsed.questions[1].question_type, "Z");
        assert_eq!(parsed.skipped_segments, 1);
    }

    #[test]
    fn test_options_split_keeps_letters() {
        let raw = "Question: Favourite colour?\nOptions: A. Red B. Green C. Blue D. Yellow";
        let questions = parse_questions(raw, "Multiple Choice", "Medium");
        assert_eq!(
            questions[0].options,
            vec!["A. Red", "B. Green", "C. Blue", "D. Yellow"]
        );
    }

    #[test]
    fn test_options_fallback_strips_letters_when_lookahead_split_fails() {
        // A leading B. marker yields one piece that still contains "B.".
        assert_eq!(split_options("B.Green"), vec!["Green"]);
        assert_eq!(split_options("B. Green"), vec!["Green"]);
    }

    #[test]
    fn test_options_without_markers_stay_whole() {
        assert_eq!(split_options("True or False"), vec!["True or False"]);
        assert!(split_options("").is_empty());
    }

    #[test]
    fn test_defaults_apply_when_fields_missing() {
        let questions = parse_questions("Question: Describe ownership.", "Technical", "Hard");
        assert_eq!(questions[0].question_type, "Technical");
        assert_eq!(questions[0].difficulty, "Hard");
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_based_on_is_optional_metadata() {
        let raw = "Question: Walk me through the cache you built.\n\
                   Type: Technical\n\
                   Difficulty: Medium\n\
                   Based On: Payments project\n\
                   ---\n\
                   Question: Why Rust?\n\
                   Based On:";
        let questions = parse_questions(raw, "Technical", "Medium");
        assert_eq!(questions[0].based_on.as_deref(), Some("Payments project"));
        assert_eq!(questions[1].based_on, None);
    }

    #[test]
    fn test_first_question_line_seeds_the_record() {
        let raw = "Question: First?\nQuestion: Second?";
        let questions = parse_questions(raw, "T", "D");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "First?");
    }

    #[test]
    fn test_empty_question_value_is_dropped() {
        let raw = "Question:   \nType: Technical";
        let parsed = parse_questions_with_report(raw, "T", "D");
        assert!(parsed.questions.is_empty());
        assert_eq!(parsed.skipped_segments, 1);
    }

    #[test]
    fn test_prefixes_are_case_sensitive_and_numbering_is_ignored() {
        let raw = "question: lower?\n---\n1. Question: numbered?\n---\nQuestion: ok?";
        let questions = parse_questions(raw, "T", "D");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "ok?");
    }

    #[test]
    fn test_crlf_and_blank_lines_are_tolerated() {
        let raw = "\r\n\r\nQuestion: Windows?\r\n\r\nType: Behavioral\r\n";
        let questions = parse_questions(raw, "T", "D");
        assert_eq!(questions[0].question, "Windows?");
        assert_eq!(questions[0].question_type, "Behavioral");
    }

    #[test]
    fn test_prose_only_output_yields_nothing() {
        assert!(parse_questions("Sorry, I cannot help with that.", "T", "D").is_empty());
        assert!(parse_questions("", "T", "D").is_empty());
        assert!(parse_questions("---\n---", "T", "D").is_empty());
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let first = parse_questions(MCQ_OUTPUT, "Multiple Choice", "Medium");
        let second = parse_questions(MCQ_OUTPUT, "Multiple Choice", "Medium");
        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_with_type_and_based_on_keys() {
        let q = GeneratedQuestion {
            question: "Q?".to_string(),
            question_type: "Technical".to_string(),
            difficulty: "Medium".to_string(),
            options: vec![],
            based_on: Some("Project X".to_string()),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "Technical");
        assert_eq!(json["basedOn"], "Project X");

        let without: serde_json::Value = serde_json::to_value(GeneratedQuestion {
            based_on: None,
            ..q
        })
        .unwrap();
        assert!(without.get("basedOn").is_none());
    }
}
