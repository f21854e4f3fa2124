use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        live_session::{CreateLiveSessionRequest, LiveSessionResponse, SessionTransition},
        MessageResponse,
    },
    state::AppState,
    types::{CourseId, SessionId},
    validation::ValidatedJson,
};

pub async fn create_live_session(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateLiveSessionRequest>,
) -> Result<(StatusCode, Json<LiveSessionResponse>), AppError> {
    let session = state
        .live_sessions
        .create(CourseId::new(payload.course_id))
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_live_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<Json<LiveSessionResponse>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.live_sessions.get(id).await?))
}

/// An id that cannot name any session (non-numeric, out of range) gets the
/// same answer as an unknown one.
fn transition_target(
    path: Result<Path<SessionId>, PathRejection>,
    transition: SessionTransition,
) -> Result<SessionId, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::invalid_transition(transition.from_status()))
}

pub async fn start_live_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = transition_target(path, SessionTransition::Start)?;
    state.live_sessions.start(id).await?;
    Ok(Json(MessageResponse::new("Live session started")))
}

pub async fn end_live_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = transition_target(path, SessionTransition::End)?;
    state.live_sessions.end(id).await?;
    Ok(Json(MessageResponse::new("Live session ended")))
}
