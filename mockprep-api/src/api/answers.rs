//! Answer submission and listing

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use mockprep_common::evaluation::EvaluationRequest;
use mockprep_common::models::Answer;
use mockprep_common::SpeechMetrics;
use serde::Deserialize;
use tracing::info;

use super::interviews::find_interview;
use crate::db::answers::{self, InsertOutcome};
use crate::error::{ApiError, ApiResult};
use crate::services::evaluate_answer;
use crate::AppState;

/// POST /api/interviews/:id/answers body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    /// 0-based index into the interview's question list
    pub question_index: u32,
    pub user_answer: String,
    #[serde(default)]
    pub speech_metrics: Option<SpeechMetrics>,
}

fn duplicate(interview_id: uuid::Uuid, index: u32) -> ApiError {
    ApiError::Conflict(format!(
        "Question {} of interview {} is already answered",
        index, interview_id
    ))
}

fn already_completed(interview_id: uuid::Uuid) -> ApiError {
    ApiError::Conflict(format!("Interview {} is already completed", interview_id))
}

/// POST /api/interviews/:id/answers
///
/// Evaluates the answer, then stores it. Nothing is stored when evaluation
/// fails.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitAnswerRequest>,
) -> ApiResult<(StatusCode, Json<Answer>)> {
    let interview = find_interview(&state, &id).await?;
    if interview.is_completed() {
        return Err(already_completed(interview.id));
    }

    let index = request.question_index;
    let question = interview.question(index).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "questionIndex {} out of range (interview has {} questions)",
            index,
            interview.questions.len()
        ))
    })?;

    // Checked up front to avoid an AI call for an answer that cannot be stored
    if answers::answer_exists(&state.db, interview.id, index).await? {
        return Err(duplicate(interview.id, index));
    }

    let evaluation_request = EvaluationRequest {
        question_text: question.text.clone(),
        user_answer: request.user_answer,
        role: interview.role.clone(),
        experience_level: interview.experience_level.clone(),
        speech_metrics: request.speech_metrics,
    };
    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &evaluation_request,
        question.keywords.as_deref(),
    )
    .await?;

    let answer = Answer::from_evaluation(
        interview.id,
        index,
        evaluation_request.question_text,
        evaluation_request.user_answer,
        evaluation,
    );

    match answers::insert_answer(&state.db, &answer).await? {
        InsertOutcome::Inserted => {}
        InsertOutcome::Duplicate => return Err(duplicate(interview.id, index)),
        // Completed or deleted while the evaluation was in flight
        InsertOutcome::InterviewCompleted => return Err(already_completed(interview.id)),
        InsertOutcome::InterviewMissing => {
            return Err(ApiError::NotFound(format!("Interview {}", interview.id)))
        }
    }

    info!(
        interview_id = %interview.id,
        question_index = index,
        overall_score = answer.overall_score,
        "Answer stored"
    );

    Ok((StatusCode::CREATED, Json(answer)))
}

/// GET /api/interviews/:id/answers
pub async fn list_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Answer>>> {
    let interview = find_interview(&state, &id).await?;
    Ok(Json(answers::list_answers(&state.db, interview.id).await?))
}

pub fn answer_routes() -> Router<AppState> {
    Router::new().route(
        "/api/interviews/:id/answers",
        post(submit_answer).get(list_answers),
    )
}
