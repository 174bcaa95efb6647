//! Validation of raw AI completions
//!
//! Completions are untrusted text. They are repaired (code fences and chatter
//! around the JSON are dropped), parsed, and shape-checked before any field is
//! used. The result is tagged: `Ok`, [`PayloadError::Parse`] or
//! [`PayloadError::Shape`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Difficulty, Question};

/// Default expected answer time for generated questions (seconds)
pub const DEFAULT_EXPECTED_TIME: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Completion text is not JSON, even after repair
    #[error("AI response is not valid JSON: {0}")]
    Parse(String),

    /// JSON with the wrong structure or field types
    #[error("AI response has unexpected shape: {0}")]
    Shape(String),
}

/// Evaluation fields as proposed by the AI, before normalization
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvaluation {
    pub technical_score: f64,
    pub communication_score: f64,
    pub depth_score: f64,
    /// Accepted for compatibility, never used
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub ideal_answer: String,
    #[serde(default)]
    pub follow_up_tip: Option<String>,
    #[serde(default)]
    pub encouragement: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    text: String,
    difficulty: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    expected_time: Option<u32>,
}

/// Candidate JSON slices of a completion, in order of their opening bracket
///
/// Each candidate runs from an opening bracket in `openers` to the last
/// matching closing bracket, which drops ```json fences and prose around the
/// payload. Brackets inside the prose only add candidates that fail to parse.
pub fn json_candidates<'a>(raw: &'a str, openers: &'a [char]) -> impl Iterator<Item = &'a str> + 'a {
    let trimmed = raw.trim();
    trimmed
        .char_indices()
        .filter(move |(_, c)| openers.contains(c))
        .map(move |(start, open)| {
            let close = if open == '{' { '}' } else { ']' };
            match trimmed.rfind(close) {
                Some(end) if end > start => &trimmed[start..=end],
                _ => &trimmed[start..],
            }
        })
}

/// First candidate that parses, or the error of the earliest one
fn parse_value(raw: &str, openers: &[char]) -> Result<Value, PayloadError> {
    let mut first_error = None;
    for candidate in json_candidates(raw, openers) {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(PayloadError::Parse(e.to_string())),
        None => serde_json::from_str(raw.trim()).map_err(|e| PayloadError::Parse(e.to_string())),
    }
}

/// Parse and shape-check an evaluation completion
pub fn parse_evaluation(raw: &str) -> Result<RawEvaluation, PayloadError> {
    let value = parse_value(raw, &['{'])?;
    if !value.is_object() {
        return Err(PayloadError::Shape("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| PayloadError::Shape(e.to_string()))
}

/// Parse generated questions, keeping at most `limit`
///
/// Accepts either a bare array or `{"questions": [...]}`. Generated questions
/// never carry keywords.
pub fn parse_questions(raw: &str, limit: usize) -> Result<Vec<Question>, PayloadError> {
    let value = parse_value(raw, &['[', '{'])?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(PayloadError::Shape(
                    "expected a \"questions\" array".to_string(),
                ))
            }
        },
        _ => return Err(PayloadError::Shape("expected an array of questions".to_string())),
    };

    let mut questions = Vec::with_capacity(items.len().min(limit));
    for (index, item) in items.into_iter().take(limit).enumerate() {
        let raw: RawQuestion = serde_json::from_value(item)
            .map_err(|e| PayloadError::Shape(format!("question {}: {}", index, e)))?;

        let text = raw.text.trim().to_string();
        if text.is_empty() {
            return Err(PayloadError::Shape(format!("question {}: empty text", index)));
        }
        let difficulty: Difficulty = raw
            .difficulty
            .parse()
            .map_err(|e| PayloadError::Shape(format!("question {}: {}", index, e)))?;

        questions.push(Question {
            text,
            difficulty,
            topic: raw
                .topic
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "general".to_string()),
            expected_time: raw.expected_time.unwrap_or(DEFAULT_EXPECTED_TIME),
            keywords: None,
        });
    }

    if questions.is_empty() {
        return Err(PayloadError::Shape("no questions returned".to_string()));
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "technicalScore": 8,
        "communicationScore": 7.5,
        "depthScore": 6,
        "overallScore": 100,
        "strengths": ["Concrete example"],
        "weaknesses": ["No trade-offs"],
        "idealAnswer": "Discuss both approaches",
        "encouragement": "Nice work"
    }"#;

    #[test]
    fn test_json_candidates_strip_fences_and_prose() {
        let raw = "Here is the evaluation:\n```json\n{\"a\": 1}\n```\nGood luck!";
        assert_eq!(json_candidates(raw, &['{']).next(), Some("{\"a\": 1}"));

        let array = "```\n[1, 2]\n```";
        assert_eq!(json_candidates(array, &['[', '{']).next(), Some("[1, 2]"));

        assert_eq!(json_candidates("  no json here ", &['{']).next(), None);
    }

    #[test]
    fn test_brackets_in_leading_prose() {
        let raw = format!("Evaluation (scale [0-10]):\n```json\n{}\n```", VALID);
        let evaluation = parse_evaluation(&raw).unwrap();
        assert_eq!(evaluation.technical_score, 8.0);
        assert_eq!(evaluation.strengths, vec!["Concrete example".to_string()]);

        let questions = parse_questions(
            r#"Difficulty is one of [easy, medium, hard]. {"questions": [{"text": "What is a mutex?", "difficulty": "easy"}]}"#,
            3,
        )
        .unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "What is a mutex?");
    }

    #[test]
    fn test_parse_evaluation_ok() {
        let raw = parse_evaluation(VALID).unwrap();
        assert_eq!(raw.technical_score, 8.0);
        assert_eq!(raw.communication_score, 7.5);
        assert_eq!(raw.overall_score, Some(100.0));
        assert_eq!(raw.encouragement.as_deref(), Some("Nice work"));
        assert!(raw.follow_up_tip.is_none());
    }

    #[test]
    fn test_parse_evaluation_inside_fence() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert!(parse_evaluation(&fenced).is_ok());
    }

    #[test]
    fn test_parse_error_for_non_json() {
        assert!(matches!(
            parse_evaluation("I cannot evaluate this answer."),
            Err(PayloadError::Parse(_))
        ));
        assert!(matches!(
            parse_evaluation("{\"technicalScore\": 8,"),
            Err(PayloadError::Parse(_))
        ));
    }

    #[test]
    fn test_shape_error_for_wrong_types() {
        let string_score = VALID.replace("\"technicalScore\": 8", "\"technicalScore\": \"eight\"");
        assert!(matches!(
            parse_evaluation(&string_score),
            Err(PayloadError::Shape(_))
        ));

        let missing_ideal = r#"{"technicalScore": 1, "communicationScore": 2, "depthScore": 3}"#;
        assert!(matches!(
            parse_evaluation(missing_ideal),
            Err(PayloadError::Shape(_))
        ));

        let bad_list = VALID.replace("[\"Concrete example\"]", "[1, 2]");
        assert!(matches!(parse_evaluation(&bad_list), Err(PayloadError::Shape(_))));

        assert!(matches!(parse_evaluation("[1, 2, 3]"), Err(PayloadError::Shape(_))));
    }

    #[test]
    fn test_parse_questions_wrapped_and_bare() {
        let wrapped = r#"{"questions": [
            {"text": "What is a mutex?", "difficulty": "Easy", "topic": "concurrency", "expectedTime": 90},
            {"text": "Design a rate limiter", "difficulty": "hard"}
        ]}"#;
        let questions = parse_questions(wrapped, 5).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].difficulty, Difficulty::Easy);
        assert_eq!(questions[0].expected_time, 90);
        assert_eq!(questions[1].topic, "general");
        assert_eq!(questions[1].expected_time, DEFAULT_EXPECTED_TIME);
        assert!(questions.iter().all(|q| q.keywords.is_none()));

        let bare = r#"[{"text": "Q1", "difficulty": "medium"}, {"text": "Q2", "difficulty": "medium"}]"#;
        assert_eq!(parse_questions(bare, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_questions_shape_errors() {
        assert!(matches!(
            parse_questions(r#"{"items": []}"#, 3),
            Err(PayloadError::Shape(_))
        ));
        assert!(matches!(parse_questions("[]", 3), Err(PayloadError::Shape(_))));
        assert!(matches!(
            parse_questions(r#"[{"text": "  ", "difficulty": "easy"}]"#, 3),
            Err(PayloadError::Shape(_))
        ));
        assert!(matches!(
            parse_questions(r#"[{"text": "Q", "difficulty": "impossible"}]"#, 3),
            Err(PayloadError::Shape(_))
        ));
    }
}
