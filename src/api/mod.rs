pub mod health;
pub mod invitations;
pub mod jobs;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::error::{AppError, Result};
use crate::security::is_authorized;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        .merge(health::health_routes())
        .with_state(state)
}

/// API v1 routes, guarded by the intake token when one is configured
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/invitations", invitations::invitation_routes())
        .nest("/jobs", jobs::job_routes())
        .layer(middleware::from_fn_with_state(state, require_intake_token))
}

async fn require_intake_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !is_authorized(state.config.intake_api_token.as_deref(), request.headers()) {
        return Err(AppError::Unauthorized(
            "Missing or invalid bearer token".to_string(),
        ));
    }
    Ok(next.run(request).await)
}
