use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    if let Err(err) = state.health.check_database().await {
        tracing::error!(error = ?err, "Database health check failed");
        return Err(AppError::ServiceUnavailable("Database unavailable".into()));
    }
    Ok(Json(HealthResponse {
        status: "ok".into(),
    }))
}
