//! Interview lifecycle endpoints
//!
//! Create (AI-generated or caller-supplied questions), list, fetch, delete,
//! complete and summarize.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use mockprep_common::analytics::{rounded_mean, skill_breakdown, SkillBreakdown, SkillSample};
use mockprep_common::models::{
    Answer, Difficulty, Interview, InterviewDuration, InterviewMode, InterviewStatus, NewInterview,
    Question,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{parse_id, require_text};
use crate::db::{answers, interviews};
use crate::error::{ApiError, ApiResult};
use crate::services::generate_questions;
use crate::AppState;

const DOCUMENT_TOPIC: &str = "document";

/// POST /api/interviews body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub user_id: String,
    pub role: String,
    pub experience_level: String,
    pub interview_type: String,
    #[serde(default)]
    pub duration: InterviewDuration,
    #[serde(default)]
    pub mode: InterviewMode,
    /// Document-derived questions; when absent, questions are generated
    #[serde(default)]
    pub questions: Option<Vec<DocumentQuestion>>,
}

/// Caller-supplied question with its expected keywords
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuestion {
    pub text: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub expected_time: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl DocumentQuestion {
    fn into_question(self, index: usize) -> ApiResult<Question> {
        let text = require_text(&format!("questions[{}].text", index), &self.text)?;
        Ok(Question {
            text,
            difficulty: self.difficulty,
            topic: self
                .topic
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DOCUMENT_TOPIC.to_string()),
            expected_time: self
                .expected_time
                .unwrap_or(mockprep_common::evaluation::parse::DEFAULT_EXPECTED_TIME),
            keywords: Some(self.keywords),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
}

/// Interview with its answers and per-skill averages
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub interview: Interview,
    pub answers: Vec<Answer>,
    pub answered_count: usize,
    pub total_questions: usize,
    /// Rounded mean of answer overall scores so far
    pub average_score: u32,
    pub skill_averages: SkillBreakdown,
}

impl InterviewSummary {
    fn new(interview: Interview, answers: Vec<Answer>) -> Self {
        let scores: Vec<u32> = answers.iter().map(|a| a.overall_score).collect();
        let samples: Vec<SkillSample> = answers.iter().map(skill_sample).collect();
        Self {
            answered_count: answers.len(),
            total_questions: interview.questions.len(),
            average_score: rounded_mean(&scores),
            skill_averages: skill_breakdown(&samples),
            interview,
            answers,
        }
    }
}

fn skill_sample(answer: &Answer) -> SkillSample {
    SkillSample {
        technical: answer.technical_score,
        communication: answer.communication_score,
        depth: answer.depth_score,
    }
}

pub(crate) async fn find_interview(state: &AppState, raw_id: &str) -> ApiResult<Interview> {
    let id = parse_id(raw_id)?;
    interviews::load_interview(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Interview {}", id)))
}

/// POST /api/interviews
pub async fn create_interview(
    State(state): State<AppState>,
    Json(request): Json<CreateInterviewRequest>,
) -> ApiResult<(StatusCode, Json<Interview>)> {
    let user_id = require_text("userId", &request.user_id)?;
    let role = require_text("role", &request.role)?;
    let experience_level = require_text("experienceLevel", &request.experience_level)?;
    let interview_type = require_text("interviewType", &request.interview_type)?;

    let questions = match request.questions {
        Some(supplied) => {
            if supplied.is_empty() {
                return Err(ApiError::BadRequest(
                    "questions must not be empty when supplied".to_string(),
                ));
            }
            supplied
                .into_iter()
                .enumerate()
                .map(|(index, q)| q.into_question(index))
                .collect::<ApiResult<Vec<_>>>()?
        }
        None => {
            generate_questions(
                state.llm.as_ref(),
                &role,
                &experience_level,
                &interview_type,
                request.duration,
            )
            .await?
        }
    };

    let interview = Interview::new(NewInterview {
        user_id,
        role,
        experience_level,
        interview_type,
        duration: request.duration,
        mode: request.mode,
        questions,
    });
    interviews::save_interview(&state.db, &interview).await?;

    info!(
        interview_id = %interview.id,
        user_id = %interview.user_id,
        questions = interview.questions.len(),
        "Interview created"
    );

    Ok((StatusCode::CREATED, Json(interview)))
}

/// GET /api/interviews?user_id=
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Interview>>> {
    let user_id = require_text("user_id", &query.user_id)?;
    Ok(Json(interviews::list_interviews(&state.db, &user_id).await?))
}

/// GET /api/interviews/:id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Interview>> {
    Ok(Json(find_interview(&state, &id).await?))
}

/// DELETE /api/interviews/:id
pub async fn delete_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if !interviews::delete_interview(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Interview {}", id)));
    }
    info!(interview_id = %id, "Interview deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/interviews/:id/complete
///
/// Total score is the rounded mean of the answers' overall scores.
pub async fn complete_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InterviewSummary>> {
    let interview = find_interview(&state, &id).await?;
    if !interview.status.can_transition_to(InterviewStatus::Completed) {
        return Err(ApiError::Conflict(format!(
            "Interview {} is already completed",
            interview.id
        )));
    }

    let answers = answers::list_answers(&state.db, interview.id).await?;
    if answers.is_empty() {
        return Err(ApiError::BadRequest(
            "Cannot complete an interview with no answers".to_string(),
        ));
    }

    let scores: Vec<u32> = answers.iter().map(|a| a.overall_score).collect();
    let total_score = rounded_mean(&scores);
    let completed_at = mockprep_common::time::now();

    if !interviews::complete_interview(&state.db, interview.id, total_score, completed_at).await? {
        return Err(ApiError::Conflict(format!(
            "Interview {} is already completed",
            interview.id
        )));
    }

    info!(interview_id = %interview.id, total_score, "Interview completed");

    let interview = find_interview(&state, &id).await?;
    Ok(Json(InterviewSummary::new(interview, answers)))
}

/// GET /api/interviews/:id/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InterviewSummary>> {
    let interview = find_interview(&state, &id).await?;
    let answers = answers::list_answers(&state.db, interview.id).await?;
    Ok(Json(InterviewSummary::new(interview, answers)))
}

pub fn interview_routes() -> Router<AppState> {
    Router::new()
        .route("/api/interviews", post(create_interview).get(list_interviews))
        .route(
            "/api/interviews/:id",
            get(get_interview).delete(delete_interview),
        )
        .route("/api/interviews/:id/complete", post(complete_interview))
        .route("/api/interviews/:id/summary", get(get_summary))
}
