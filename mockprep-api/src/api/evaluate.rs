//! Stateless evaluation of a single answer (free practice)

use axum::{extract::State, routing::post, Json, Router};
use mockprep_common::evaluation::{Evaluation, EvaluationRequest};
use serde::Deserialize;

use super::require_text;
use crate::error::ApiResult;
use crate::services::evaluate_answer;
use crate::AppState;

/// POST /api/evaluate body: an evaluation request plus optional keywords
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(flatten)]
    pub request: EvaluationRequest,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// POST /api/evaluate
///
/// Runs the same pipeline as a stored answer but persists nothing.
pub async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateRequest>,
) -> ApiResult<Json<Evaluation>> {
    require_text("questionText", &body.request.question_text)?;

    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &body.request,
        body.keywords.as_deref(),
    )
    .await?;

    Ok(Json(evaluation))
}

pub fn evaluate_routes() -> Router<AppState> {
    Router::new().route("/api/evaluate", post(evaluate))
}
