//! Analytics and leaderboard endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use mockprep_common::analytics::{
    self, leaderboard::effective_limit, AnalyticsReport, LeaderboardEntry, TimeRange,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::require_text;
use crate::db::{answers, interviews};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub user_id: String,
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub range: TimeRange,
    pub entries: Vec<LeaderboardEntry>,
}

fn parse_range(raw: Option<&str>) -> ApiResult<TimeRange> {
    Ok(raw.map(str::parse::<TimeRange>).transpose()?.unwrap_or_default())
}

/// GET /api/analytics?user_id=&range=
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    let user_id = require_text("user_id", &query.user_id)?;
    let range = parse_range(query.range.as_deref())?;
    let now = mockprep_common::time::now();

    let completed = interviews::completed_for_user(&state.db, &user_id).await?;
    let in_window = analytics::filter_by_range(completed, range, now);

    let ids: HashSet<_> = in_window.iter().map(|i| i.id).collect();
    let skills: Vec<_> = answers::skill_samples_for_user(&state.db, &user_id)
        .await?
        .into_iter()
        .filter(|(interview_id, _)| ids.contains(interview_id))
        .map(|(_, sample)| sample)
        .collect();

    debug!(
        user_id = %user_id,
        ?range,
        interviews = in_window.len(),
        answers = skills.len(),
        "Aggregating analytics"
    );

    Ok(Json(analytics::aggregate(&in_window, &skills)))
}

/// GET /api/leaderboard?range=&limit=
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let range = parse_range(query.range.as_deref())?;
    let now = mockprep_common::time::now();

    let completed = interviews::completed_all(&state.db).await?;
    let in_window = analytics::filter_by_range(completed, range, now);

    Ok(Json(LeaderboardResponse {
        range,
        entries: analytics::leaderboard(&in_window, effective_limit(query.limit)),
    }))
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", get(get_analytics))
        .route("/api/leaderboard", get(get_leaderboard))
}
