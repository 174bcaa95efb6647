//! Answer evaluation: AI scoring followed by the local pipeline
//!
//! Transport failures fall back to the default evaluation so the user still
//! gets feedback; a reply that arrives but fails validation is an error and
//! nothing is stored.

use mockprep_common::evaluation::{
    self, default_evaluation, parse_evaluation, Evaluation, EvaluationRequest,
};
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::llm::{prompts, CompletionProvider};

/// Evaluate one answer
///
/// `keywords` is only present for document-derived questions.
pub async fn evaluate_answer(
    llm: &dyn CompletionProvider,
    request: &EvaluationRequest,
    keywords: Option<&[String]>,
) -> ApiResult<Evaluation> {
    let speech = request.speech_metrics.as_ref();

    let raw = match llm.complete(prompts::answer_evaluation(request)).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                model = llm.model(),
                error = %e,
                "Evaluation request failed, using default evaluation"
            );
            let mut fallback = default_evaluation();
            evaluation::annotate(&mut fallback, keywords, &request.user_answer, speech);
            return Ok(fallback);
        }
    };

    let parsed = parse_evaluation(&raw).map_err(|e| {
        warn!(model = llm.model(), error = %e, "Rejected evaluation reply");
        e
    })?;

    let result = evaluation::finalize(parsed, keywords, &request.user_answer, speech);
    debug!(overall_score = result.overall_score, "Answer evaluated");
    Ok(result)
}
