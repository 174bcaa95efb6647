//! Answer persistence

use mockprep_common::analytics::SkillSample;
use mockprep_common::evaluation::Evaluation;
use mockprep_common::models::Answer;
use mockprep_common::{time, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::interviews::parse_uuid;

/// Outcome of storing an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An answer for this (interview, question index) already exists
    Duplicate,
    /// The interview was completed before the answer could be stored
    InterviewCompleted,
    /// The interview no longer exists
    InterviewMissing,
}

/// Store an answer and move a pending interview to in_progress
///
/// Both writes share one transaction. The insert only applies while the
/// interview is not completed; any outcome other than `Inserted` leaves the
/// database unchanged.
pub async fn insert_answer(pool: &SqlitePool, answer: &Answer) -> Result<InsertOutcome> {
    let evaluation = serde_json::to_string(&answer.evaluation)?;
    let interview_id = answer.interview_id.to_string();

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO answers (
            id, interview_id, question_index, question_text, user_answer,
            technical_score, communication_score, depth_score, overall_score,
            evaluation, ideal_answer, created_at
        )
        SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM interviews WHERE id = ? AND status != 'completed')
        "#,
    )
    .bind(answer.id.to_string())
    .bind(&interview_id)
    .bind(i64::from(answer.question_index))
    .bind(&answer.question_text)
    .bind(&answer.user_answer)
    .bind(answer.technical_score)
    .bind(answer.communication_score)
    .bind(answer.depth_score)
    .bind(i64::from(answer.overall_score))
    .bind(evaluation)
    .bind(&answer.ideal_answer)
    .bind(time::to_db(&answer.created_at))
    .bind(&interview_id)
    .execute(&mut *tx)
    .await;

    match inserted {
        Ok(result) if result.rows_affected() == 0 => {
            let status: Option<String> = sqlx::query_scalar("SELECT status FROM interviews WHERE id = ?")
                .bind(&interview_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;
            return Ok(match status {
                Some(_) => InsertOutcome::InterviewCompleted,
                None => InsertOutcome::InterviewMissing,
            });
        }
        Ok(_) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tx.rollback().await?;
            return Ok(InsertOutcome::Duplicate);
        }
        Err(e) => return Err(e.into()),
    }

    sqlx::query("UPDATE interviews SET status = 'in_progress' WHERE id = ? AND status = 'pending'")
        .bind(&interview_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(InsertOutcome::Inserted)
}

pub async fn answer_exists(pool: &SqlitePool, interview_id: Uuid, question_index: u32) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM answers WHERE interview_id = ? AND question_index = ?)",
    )
    .bind(interview_id.to_string())
    .bind(i64::from(question_index))
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Answers of one interview in question order
pub async fn list_answers(pool: &SqlitePool, interview_id: Uuid) -> Result<Vec<Answer>> {
    let rows = sqlx::query(
        r#"
        SELECT id, interview_id, question_index, question_text, user_answer,
               technical_score, communication_score, depth_score, overall_score,
               evaluation, ideal_answer, created_at
        FROM answers
        WHERE interview_id = ?
        ORDER BY question_index ASC
        "#,
    )
    .bind(interview_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(answer_from_row).collect()
}

/// Sub-scores of every answer on a user's completed interviews, keyed by interview
pub async fn skill_samples_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<(Uuid, SkillSample)>> {
    let rows = sqlx::query(
        r#"
        SELECT a.interview_id, a.technical_score, a.communication_score, a.depth_score
        FROM answers a
        JOIN interviews i ON i.id = a.interview_id
        WHERE i.user_id = ? AND i.status = 'completed'
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let interview_id: String = row.try_get("interview_id")?;
            Ok((
                parse_uuid("answers.interview_id", &interview_id)?,
                SkillSample {
                    technical: row.try_get("technical_score")?,
                    communication: row.try_get("communication_score")?,
                    depth: row.try_get("depth_score")?,
                },
            ))
        })
        .collect()
}

fn answer_from_row(row: &SqliteRow) -> Result<Answer> {
    let id: String = row.try_get("id")?;
    let interview_id: String = row.try_get("interview_id")?;
    let question_index: i64 = row.try_get("question_index")?;
    let overall_score: i64 = row.try_get("overall_score")?;
    let evaluation: String = row.try_get("evaluation")?;
    let evaluation: Evaluation = serde_json::from_str(&evaluation)?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Answer {
        id: parse_uuid("answers.id", &id)?,
        interview_id: parse_uuid("answers.interview_id", &interview_id)?,
        question_index: question_index.max(0) as u32,
        question_text: row.try_get("question_text")?,
        user_answer: row.try_get("user_answer")?,
        technical_score: row.try_get("technical_score")?,
        communication_score: row.try_get("communication_score")?,
        depth_score: row.try_get("depth_score")?,
        overall_score: overall_score.clamp(0, 100) as u32,
        evaluation,
        ideal_answer: row.try_get("ideal_answer")?,
        created_at: time::from_db("created_at", &created_at)?,
    })
}
