//! Interview persistence

use chrono::{DateTime, Utc};
use mockprep_common::analytics::ScoredInterview;
use mockprep_common::models::{Interview, Question};
use mockprep_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const INTERVIEW_COLUMNS: &str = "id, user_id, role, experience_level, interview_type, duration, \
     mode, questions, status, total_score, created_at, completed_at";

pub async fn save_interview(pool: &SqlitePool, interview: &Interview) -> Result<()> {
    let questions = serde_json::to_string(&interview.questions)?;

    sqlx::query(
        r#"
        INSERT INTO interviews (
            id, user_id, role, experience_level, interview_type, duration,
            mode, questions, status, total_score, created_at, completed_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(interview.id.to_string())
    .bind(&interview.user_id)
    .bind(&interview.role)
    .bind(&interview.experience_level)
    .bind(&interview.interview_type)
    .bind(interview.duration.as_str())
    .bind(interview.mode.as_str())
    .bind(questions)
    .bind(interview.status.as_str())
    .bind(interview.total_score.map(i64::from))
    .bind(time::to_db(&interview.created_at))
    .bind(interview.completed_at.as_ref().map(time::to_db))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_interview(pool: &SqlitePool, id: Uuid) -> Result<Option<Interview>> {
    let query = format!("SELECT {} FROM interviews WHERE id = ?", INTERVIEW_COLUMNS);
    let row = sqlx::query(&query)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(interview_from_row).transpose()
}

/// A user's interviews, newest first
pub async fn list_interviews(pool: &SqlitePool, user_id: &str) -> Result<Vec<Interview>> {
    let query = format!(
        "SELECT {} FROM interviews WHERE user_id = ? ORDER BY created_at DESC",
        INTERVIEW_COLUMNS
    );
    let rows = sqlx::query(&query).bind(user_id).fetch_all(pool).await?;

    rows.iter().map(interview_from_row).collect()
}

/// Delete an interview and its answers; false when it did not exist
pub async fn delete_interview(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let id = id.to_string();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM answers WHERE interview_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM interviews WHERE id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Set the total score and mark completed
///
/// Guarded on the current status, so the score is written at most once.
/// Returns false when the interview was already completed (or missing).
pub async fn complete_interview(
    pool: &SqlitePool,
    id: Uuid,
    total_score: u32,
    completed_at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE interviews
        SET status = 'completed', total_score = ?, completed_at = ?
        WHERE id = ? AND status != 'completed'
        "#,
    )
    .bind(i64::from(total_score))
    .bind(time::to_db(&completed_at))
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Completed interviews for one user, oldest first
pub async fn completed_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<ScoredInterview>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, role, interview_type, total_score, created_at
        FROM interviews
        WHERE user_id = ? AND status = 'completed'
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(scored_from_row).collect()
}

/// Completed interviews across all users
pub async fn completed_all(pool: &SqlitePool) -> Result<Vec<ScoredInterview>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, role, interview_type, total_score, created_at
        FROM interviews
        WHERE status = 'completed'
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(scored_from_row).collect()
}

pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Internal(format!("Invalid UUID in {}: {}", column, e)))
}

fn score_from_db(value: Option<i64>) -> Option<u32> {
    value.map(|s| s.clamp(0, 100) as u32)
}

fn interview_from_row(row: &SqliteRow) -> Result<Interview> {
    let id: String = row.try_get("id")?;
    let questions: String = row.try_get("questions")?;
    let questions: Vec<Question> = serde_json::from_str(&questions)?;
    let duration: String = row.try_get("duration")?;
    let mode: String = row.try_get("mode")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let completed_at: Option<String> = row.try_get("completed_at")?;

    Ok(Interview {
        id: parse_uuid("interviews.id", &id)?,
        user_id: row.try_get("user_id")?,
        role: row.try_get("role")?,
        experience_level: row.try_get("experience_level")?,
        interview_type: row.try_get("interview_type")?,
        duration: duration.parse()?,
        mode: mode.parse()?,
        questions,
        status: status.parse()?,
        total_score: score_from_db(row.try_get("total_score")?),
        created_at: time::from_db("created_at", &created_at)?,
        completed_at: completed_at
            .map(|value| time::from_db("completed_at", &value))
            .transpose()?,
    })
}

fn scored_from_row(row: &SqliteRow) -> Result<ScoredInterview> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(ScoredInterview {
        id: parse_uuid("interviews.id", &id)?,
        user_id: row.try_get("user_id")?,
        role: row.try_get("role")?,
        interview_type: row.try_get("interview_type")?,
        total_score: score_from_db(row.try_get("total_score")?),
        created_at: time::from_db("created_at", &created_at)?,
    })
}
