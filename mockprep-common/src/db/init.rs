//! Database initialization
//!
//! Creates the data folder and database file on first run, then brings the
//! schema up to date. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating if needed) the database at `db_path` and initialize the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas go on the connect options so every pooled connection gets them
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Create missing tables and run pending migrations
///
/// Exposed separately so tests can run it against an in-memory pool.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_interviews_table(pool).await?;
    create_answers_table(pool).await?;

    crate::db::migrations::run_migrations(pool).await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Interviews; `questions` holds the serialized question list
pub async fn create_interviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interviews (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            role TEXT NOT NULL,
            experience_level TEXT NOT NULL,
            interview_type TEXT NOT NULL,
            duration TEXT NOT NULL DEFAULT 'medium'
                CHECK (duration IN ('short', 'medium', 'long')),
            mode TEXT NOT NULL DEFAULT 'interview'
                CHECK (mode IN ('interview', 'practice')),
            questions TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'in_progress', 'completed')),
            total_score INTEGER CHECK (total_score IS NULL OR total_score BETWEEN 0 AND 100),
            created_at TEXT NOT NULL,
            completed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Answers; one row per (interview, question index)
pub async fn create_answers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answers (
            id TEXT PRIMARY KEY,
            interview_id TEXT NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
            question_index INTEGER NOT NULL CHECK (question_index >= 0),
            question_text TEXT NOT NULL,
            user_answer TEXT NOT NULL,
            technical_score REAL NOT NULL,
            communication_score REAL NOT NULL,
            depth_score REAL NOT NULL,
            overall_score INTEGER NOT NULL CHECK (overall_score BETWEEN 0 AND 100),
            evaluation TEXT NOT NULL,
            ideal_answer TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (interview_id, question_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
