use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::models::{JobId, JobRecord};
use crate::state::AppState;

/// Job routes
pub fn job_routes() -> Router<AppState> {
    Router::new().route("/{job_id}", get(get_job))
}

/// GET /api/v1/jobs/:job_id - Current state of a queued batch
async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobRecord>> {
    let job_id: JobId = job_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid job ID format".to_string()))?;

    let record = state
        .jobs
        .get(job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(record))
}
