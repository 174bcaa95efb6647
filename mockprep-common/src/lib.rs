//! # MockPrep Common Library
//!
//! Shared code for the MockPrep service including:
//! - Domain models (interviews, questions, answers)
//! - Answer scoring pipeline (normalizer, keyword validator, speech annotator)
//! - Session analytics and leaderboard aggregation
//! - Configuration loading
//! - Database initialization and migrations

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use evaluation::{default_evaluation, Evaluation, SpeechMetrics};
