use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Health response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub queue: QueueHealth,
    pub jobs_tracked: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct QueueHealth {
    pub capacity: usize,
    pub available: usize,
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    // A closed queue means the worker is gone.
    let status = if state.queue.is_closed() {
        "unhealthy"
    } else {
        "healthy"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        queue: QueueHealth {
            capacity: state.queue.capacity(),
            available: state.queue.available(),
        },
        jobs_tracked: state.jobs.len(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
