use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::models::{EnqueueBatchRequest, EnqueueBatchResponse};
use crate::state::AppState;

/// Invitation routes
pub fn invitation_routes() -> Router<AppState> {
    Router::new().route("/batch", post(enqueue_batch))
}

/// POST /api/v1/invitations/batch - Queue a batch for rendering and sending
async fn enqueue_batch(
    State(state): State<AppState>,
    Json(request): Json<EnqueueBatchRequest>,
) -> Result<(StatusCode, Json<EnqueueBatchResponse>)> {
    if request.invitations.is_empty() {
        return Err(AppError::BadRequest(
            "At least one invitation is required".to_string(),
        ));
    }

    let batch_size = request.invitations.len();
    let job_id = state.queue.enqueue(request.invitations)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(EnqueueBatchResponse {
            job_id,
            batch_size,
            status: "queued".to_string(),
        }),
    ))
}
