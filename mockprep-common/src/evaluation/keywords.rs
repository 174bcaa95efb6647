//! Keyword validator for document-derived questions
//!
//! Questions generated by the AI carry no keywords and skip this step.

use super::Evaluation;

/// Minimum coverage (percent of keywords found) to pass
pub const PASS_PERCENT: usize = 60;

/// Keywords listed in a strengths/weaknesses note
pub const NOTE_LIMIT: usize = 3;

/// Outcome of checking an answer against expected keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordValidation {
    pub covered: Vec<String>,
    pub missed: Vec<String>,
    /// Coverage as an integer percentage
    pub score: u32,
    pub passed: bool,
}

/// Check which keywords appear in the answer (case-insensitive substring)
///
/// Returns `None` for an empty list (after dropping blank entries); that is a
/// no-op, not a failure.
pub fn validate(keywords: &[String], answer: &str) -> Option<KeywordValidation> {
    let haystack = answer.to_lowercase();

    let (covered, missed): (Vec<String>, Vec<String>) = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .partition(|k| haystack.contains(&k.to_lowercase()));

    let total = covered.len() + missed.len();
    if total == 0 {
        return None;
    }

    let score = ((covered.len() as f64 / total as f64) * 100.0).round() as u32;
    let passed = covered.len() * 100 >= total * PASS_PERCENT;

    Some(KeywordValidation {
        covered,
        missed,
        score,
        passed,
    })
}

/// Record a validation on the evaluation and add the matching feedback note
pub fn apply(evaluation: &mut Evaluation, validation: KeywordValidation) {
    if validation.passed {
        if !validation.covered.is_empty() {
            evaluation.strengths.push(format!(
                "Covered key concepts: {}",
                first_n(&validation.covered)
            ));
        }
    } else {
        evaluation.weaknesses.push(format!(
            "Missing key concepts: {}",
            first_n(&validation.missed)
        ));
    }

    evaluation.keyword_score = Some(validation.score);
    evaluation.keywords_covered = Some(validation.covered);
    evaluation.keywords_missed = Some(validation.missed);
    evaluation.keyword_validation_passed = Some(validation.passed);
}

fn first_n(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(NOTE_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
