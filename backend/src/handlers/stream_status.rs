//! Status callback posted by the media server when a publisher connects or
//! disconnects.

use axum::{extract::State, Json};

use crate::{
    error::AppError,
    models::{
        live_session::{StreamEvent, StreamStatusCallback},
        MessageResponse,
    },
    services::{live_session::CallbackOutcome, streaming_backend::parse_stream_path},
    state::AppState,
    validation::ValidatedJson,
};

/// Acknowledges every well-formed callback, including ones that change
/// nothing. Only a malformed path or body, or a store failure, is an error.
pub async fn stream_status_callback(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StreamStatusCallback>,
) -> Result<Json<MessageResponse>, AppError> {
    let stream_key = parse_stream_path(&payload.stream_path)?;

    let Some(event) = StreamEvent::parse(&payload.status) else {
        tracing::debug!(
            stream_key,
            status = %payload.status,
            "Ignoring unrecognised media server status"
        );
        return Ok(Json(MessageResponse::new("Status ignored")));
    };

    let message = match state
        .live_sessions
        .apply_external_status(stream_key, event)
        .await?
    {
        CallbackOutcome::Applied(_) => "Status applied",
        CallbackOutcome::Ignored => "Status ignored",
    };
    Ok(Json(MessageResponse::new(message)))
}
