//! Answer evaluation pipeline
//!
//! Turns an untrusted AI evaluation into the stored [`Evaluation`]:
//!
//! 1. [`parse`]: repair and shape-check the raw completion text
//! 2. [`normalizer`]: clamp sub-scores, recompute the overall score
//! 3. [`keywords`]: keyword coverage for document-derived questions
//! 4. [`speech`]: filler-word and pace feedback for voice answers
//!
//! Every step after parsing is a total function. Upstream failures are the
//! caller's concern; it substitutes [`default_evaluation`] instead of running
//! the normalizer.

pub mod keywords;
pub mod normalizer;
pub mod parse;
pub mod speech;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use keywords::KeywordValidation;
pub use parse::{parse_evaluation, parse_questions, PayloadError, RawEvaluation};

/// Client-side speech measurements attached to a voice answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechMetrics {
    pub filler_word_count: u32,
    /// Occurrences per filler word ("um" → 3)
    #[serde(default)]
    pub filler_words: BTreeMap<String, u32>,
    pub words_per_minute: f64,
    /// Speaking time in seconds
    pub speaking_time: f64,
}

/// Input for evaluating one answer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question_text: String,
    pub user_answer: String,
    pub role: String,
    pub experience_level: String,
    #[serde(default)]
    pub speech_metrics: Option<SpeechMetrics>,
}

/// Final evaluation of one answer, as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub technical_score: f64,
    pub communication_score: f64,
    pub depth_score: f64,
    /// 0-100, always derived from the three sub-scores
    pub overall_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ideal_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_tip: Option<String>,
    pub encouragement: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_covered: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_missed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_validation_passed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler_word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<BTreeMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_per_minute: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking_time: Option<f64>,
}

/// Fallback evaluation used when the upstream AI call fails
///
/// Returns a fresh value on every call.
pub fn default_evaluation() -> Evaluation {
    Evaluation {
        technical_score: 5.0,
        communication_score: 5.0,
        depth_score: 5.0,
        overall_score: 50,
        strengths: vec!["You provided a complete response to the question".to_string()],
        weaknesses: vec![
            "Detailed feedback is unavailable right now; compare your answer with the ideal answer"
                .to_string(),
        ],
        ideal_answer: "An ideal answer could not be generated for this question.".to_string(),
        follow_up_tip: None,
        encouragement: "Keep practicing, every answer builds confidence.".to_string(),
        keyword_score: None,
        keywords_covered: None,
        keywords_missed: None,
        keyword_validation_passed: None,
        filler_word_count: None,
        filler_words: None,
        words_per_minute: None,
        speaking_time: None,
    }
}

/// Run the full pipeline over a validated AI evaluation
pub fn finalize(
    raw: RawEvaluation,
    keywords: Option<&[String]>,
    answer: &str,
    speech: Option<&SpeechMetrics>,
) -> Evaluation {
    let mut evaluation = normalizer::normalize(raw);
    annotate(&mut evaluation, keywords, answer, speech);
    evaluation
}

/// Apply keyword and speech annotations to an existing evaluation
///
/// Used directly on [`default_evaluation`] when the AI call failed.
pub fn annotate(
    evaluation: &mut Evaluation,
    keywords: Option<&[String]>,
    answer: &str,
    speech: Option<&SpeechMetrics>,
) {
    if let Some(validation) = keywords.and_then(|k| keywords::validate(k, answer)) {
        keywords::apply(evaluation, validation);
    }
    if let Some(metrics) = speech {
        speech::annotate(evaluation, metrics);
    }
}
