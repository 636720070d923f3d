//! Turns a model's screening reply into a validated `ResumeAnalysis`.
//!
//! One recovery pass only: if the reply is not JSON as a whole, the span from
//! the first `{` to the last `}` is tried. Required fields must be present and
//! truthy in the JavaScript sense, so `0`, `""`, `false` and `null` count as
//! missing while empty arrays do not.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

pub const REQUIRED_FIELDS: [&str; 4] = ["atsScore", "keywords", "overallScore", "feedback"];

/// Fixed-shape screening result. Scores are passed through as returned by the
/// model, keeping integer or decimal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub ats_score: Number,
    pub keywords: Vec<String>,
    pub overall_score: Number,
    pub feedback: Vec<String>,
}

impl ResumeAnalysis {
    /// Whether both scores sit inside the advertised 0-100 range.
    pub fn scores_in_range(&self) -> bool {
        let in_range = |n: &Number| n.as_f64().is_some_and(|f| (0.0..=100.0).contains(&f));
        in_range(&self.ats_score) && in_range(&self.overall_score)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("Model output is not valid JSON")]
    Malformed,

    #[error("Model output has wrong field types: {0}")]
    WrongShape(String),

    #[error("Model output is missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
}

/// Direct parse, then a single greedy outer-brace recovery.
pub fn parse_model_json(text: &str) -> Result<Value, RecoveryError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let start = text.find('{').ok_or(RecoveryError::Malformed)?;
    let end = text.rfind('}').ok_or(RecoveryError::Malformed)?;
    if end < start {
        return Err(RecoveryError::Malformed);
    }

    serde_json::from_str::<Value>(&text[start..=end]).map_err(|_| RecoveryError::Malformed)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn missing_fields(value: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !value.get(field).is_some_and(is_truthy))
        .collect()
}

/// Full pipeline from reply text to a validated result. Partial results are discarded.
pub fn recover_analysis(text: &str) -> Result<ResumeAnalysis, RecoveryError> {
    let value = parse_model_json(text)?;

    let missing = missing_fields(&value);
    if !missing.is_empty() {
        return Err(RecoveryError::Incomplete(missing));
    }

    serde_json::from_value(value).map_err(|e| RecoveryError::WrongShape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_json_parses() {
        let analysis = recover_analysis(
            r#"{"atsScore": 72, "keywords": ["Rust"], "overallScore": 68, "feedback": ["Add metrics"]}"#,
        )
        .unwrap();
        assert_eq!(analysis.ats_score, Number::from(72));
        assert_eq!(analysis.keywords, vec!["Rust"]);
        assert_eq!(analysis.feedback, vec!["Add metrics"]);
    }

    #[test]
    fn test_json_embedded_in_prose_is_recovered() {
        let reply = "Here is the result: {\"atsScore\":80,\"keywords\":[\"a\"],\"overallScore\":75,\"feedback\":[\"ok\"]} Hope this helps!";
        let analysis = recover_analysis(reply).unwrap();
        assert_eq!(
            analysis,
            ResumeAnalysis {
                ats_score: Number::from(80),
                keywords: vec!["a".to_string()],
                overall_score: Number::from(75),
                feedback: vec!["ok".to_string()],
            }
        );
    }

    #[test]
    fn test_markdown_fenced_json_is_recovered() {
        let reply = "```json\n{\"atsScore\": 90, \"keywords\": [], \"overallScore\": 88, \"feedback\": [\"Great\"]}\n```";
        let analysis = recover_analysis(reply).unwrap();
        assert_eq!(analysis.overall_score.as_f64(), Some(88.0));
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_missing_feedback_is_incomplete() {
        let err = recover_analysis(r#"{"atsScore":80,"keywords":["a"],"overallScore":75}"#)
            .unwrap_err();
        assert_eq!(err, RecoveryError::Incomplete(vec!["feedback"]));
    }

    #[test]
    fn test_zero_score_counts_as_missing() {
        let err = recover_analysis(
            r#"{"atsScore":0,"keywords":["a"],"overallScore":75,"feedback":["x"]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecoveryError::Incomplete(vec!["atsScore"]));
    }

    #[test]
    fn test_null_fields_count_as_missing() {
        let err = recover_analysis(
            r#"{"atsScore":null,"keywords":null,"overallScore":75,"feedback":["x"]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecoveryError::Incomplete(vec!["atsScore", "keywords"]));
    }

    #[test]
    fn test_non_object_json_is_incomplete() {
        let err = recover_analysis("42").unwrap_err();
        assert_eq!(err, RecoveryError::Incomplete(REQUIRED_FIELDS.to_vec()));
    }

    #[test]
    fn test_no_braces_is_malformed() {
        assert_eq!(
            recover_analysis("I could not analyze this resume.").unwrap_err(),
            RecoveryError::Malformed
        );
        assert_eq!(recover_analysis("} backwards {").unwrap_err(), RecoveryError::Malformed);
    }

    #[test]
    fn test_broken_json_between_braces_is_malformed() {
        assert_eq!(
            recover_analysis("Result: {atsScore: 80,} done").unwrap_err(),
            RecoveryError::Malformed
        );
    }

    #[test]
    fn test_greedy_match_spans_first_to_last_brace() {
        // Two objects in prose: the greedy span covers both and is not valid JSON.
        let reply = r#"{"atsScore":1} and {"atsScore":2}"#;
        assert_eq!(parse_model_json(reply).unwrap_err(), RecoveryError::Malformed);
    }

    #[test]
    fn test_wrong_field_types_are_rejected() {
        let err = recover_analysis(
            r#"{"atsScore":"80","keywords":["a"],"overallScore":75,"feedback":["x"]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecoveryError::WrongShape(_)));
    }

    #[test]
    fn test_out_of_range_scores_pass_through() {
        let analysis = recover_analysis(
            r#"{"atsScore":140,"keywords":["a"],"overallScore":-5,"feedback":["x"]}"#,
        )
        .unwrap();
        assert_eq!(analysis.ats_score, Number::from(140));
        assert_eq!(analysis.overall_score, Number::from(-5));
        assert!(!analysis.scores_in_range());
    }

    #[test]
    fn test_truthiness_mirrors_javascript() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let analysis = ResumeAnalysis {
            ats_score: Number::from(80),
            keywords: vec![],
            overall_score: Number::from(70),
            feedback: vec![],
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["atsScore"], 80);
        assert_eq!(json["overallScore"], 70);
    }

    #[test]
    fn test_score_form_is_returned_unchanged() {
        let analysis = recover_analysis(
            r#"{"atsScore":80,"keywords":["a"],"overallScore":72.5,"feedback":["x"]}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"atsScore\":80,"));
        assert!(json.contains("\"overallScore\":72.5,"));
        assert!(analysis.scores_in_range());
    }
}
