//! Interview question generation

use mockprep_common::evaluation::parse_questions;
use mockprep_common::models::{InterviewDuration, Question};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::llm::{prompts, CompletionProvider};

/// Ask the model for questions sized to the duration bucket
///
/// Any failure (transport, unparseable JSON, wrong shape) is an error; there
/// is no fallback question set. Extra questions are dropped; fewer than
/// requested are accepted as long as at least one is valid.
pub async fn generate_questions(
    llm: &dyn CompletionProvider,
    role: &str,
    experience_level: &str,
    interview_type: &str,
    duration: InterviewDuration,
) -> ApiResult<Vec<Question>> {
    let count = duration.question_count();
    let prompt = prompts::question_generation(role, experience_level, interview_type, count);

    let raw = llm.complete(prompt).await.map_err(|e| {
        warn!(model = llm.model(), error = %e, "Question generation request failed");
        e
    })?;

    let questions = parse_questions(&raw, count).map_err(|e| {
        warn!(model = llm.model(), error = %e, "Rejected generated questions");
        e
    })?;

    if questions.len() < count {
        warn!(
            requested = count,
            received = questions.len(),
            "Model returned fewer questions than requested"
        );
    }
    info!(role, interview_type, count = questions.len(), "Generated interview questions");

    Ok(questions)
}
