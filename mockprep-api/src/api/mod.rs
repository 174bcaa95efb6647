//! HTTP API handlers for mockprep-api

pub mod analytics;
pub mod answers;
pub mod buildinfo;
pub mod evaluate;
pub mod health;
pub mod interviews;

pub use analytics::analytics_routes;
pub use answers::answer_routes;
pub use evaluate::evaluate_routes;
pub use health::health_routes;
pub use interviews::interview_routes;

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Parse a path id, 400 on malformed input
pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Reject blank required text fields
pub(crate) fn require_text(field: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
