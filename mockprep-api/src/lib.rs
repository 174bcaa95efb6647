//! mockprep-api library interface
//!
//! Exposes the router and state so integration tests can drive the service
//! without binding a socket.

pub mod api;
pub mod db;
pub mod error;
pub mod llm;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::llm::CompletionProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Completion provider used for question generation and evaluation
    pub llm: Arc<dyn CompletionProvider>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, llm: Arc<dyn CompletionProvider>) -> Self {
        Self {
            db,
            llm,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::interview_routes())
        .merge(api::answer_routes())
        .merge(api::analytics_routes())
        .merge(api::evaluate_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
