//! Live session lifecycle manager.
//!
//! Sessions move `pending -> live -> ended`. Each transition is delegated to a
//! single guarded store update; a zero row count is reported as one combined
//! "not found or invalid transition" outcome. Creation is a two-step insert then
//! provision, with a best-effort delete when provisioning fails.

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use std::sync::Arc;

use crate::config::PlaybackConfig;
use crate::models::live_session::{
    LiveSession, LiveSessionResponse, SessionStatus, SessionTransition, StreamEvent,
};
use crate::repositories::LiveSessionRepositoryTrait;
use crate::services::playback::playback_urls_for;
use crate::services::streaming_backend::{StreamingBackend, StreamingBackendError};
use crate::types::{CourseId, SessionId};

const STREAM_KEY_PREFIX: &str = "live_";
const STREAM_KEY_RANDOM_LEN: usize = 24;

#[derive(Debug, thiserror::Error)]
pub enum LiveSessionError {
    #[error("live session {0} not found")]
    NotFound(SessionId),
    #[error("live session {id} not found or not {expected}")]
    InvalidTransition {
        id: SessionId,
        expected: SessionStatus,
    },
    #[error("failed to provision stream {stream_key}: {source}")]
    Provisioning {
        stream_key: String,
        #[source]
        source: StreamingBackendError,
    },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Result of applying a media server status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Applied(SessionTransition),
    Ignored,
}

/// Random stream key drawn from the operating system CSPRNG.
pub fn generate_stream_key() -> String {
    let random: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(STREAM_KEY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", STREAM_KEY_PREFIX, random)
}

pub struct LiveSessionService {
    repo: Arc<dyn LiveSessionRepositoryTrait>,
    backend: Arc<dyn StreamingBackend>,
    playback: PlaybackConfig,
}

impl LiveSessionService {
    pub fn new(
        repo: Arc<dyn LiveSessionRepositoryTrait>,
        backend: Arc<dyn StreamingBackend>,
        playback: PlaybackConfig,
    ) -> Self {
        Self {
            repo,
            backend,
            playback,
        }
    }

    pub async fn create(
        &self,
        course_id: CourseId,
    ) -> Result<LiveSessionResponse, LiveSessionError> {
        let stream_key = generate_stream_key();
        let session = self.repo.insert_pending(course_id, &stream_key).await?;

        if let Err(source) = self.backend.provision_stream(&stream_key).await {
            tracing::error!(
                session_id = %session.id,
                %course_id,
                stream_key = %stream_key,
                error = %source,
                "Stream provisioning failed; rolling back session"
            );
            self.compensate(session.id).await;
            return Err(LiveSessionError::Provisioning { stream_key, source });
        }

        // The stream exists upstream from here on; a failed stamp is logged only.
        if let Err(err) = self.repo.mark_provisioned(session.id).await {
            tracing::error!(
                session_id = %session.id,
                stream_key = %stream_key,
                error = ?err,
                "Failed to record stream provisioning"
            );
        }

        tracing::info!(
            session_id = %session.id,
            %course_id,
            stream_key = %session.stream_key,
            "Live session created"
        );
        Ok(self.to_response(session))
    }

    async fn compensate(&self, id: SessionId) {
        match self.repo.delete(id).await {
            Ok(true) => tracing::info!(session_id = %id, "Rolled back unprovisioned session"),
            Ok(false) => {
                tracing::warn!(session_id = %id, "Unprovisioned session already gone")
            }
            Err(err) => tracing::error!(
                session_id = %id,
                error = ?err,
                "Failed to roll back unprovisioned session; row left pending"
            ),
        }
    }

    pub async fn get(&self, id: SessionId) -> Result<LiveSessionResponse, LiveSessionError> {
        let session = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(LiveSessionError::NotFound(id))?;
        Ok(self.to_response(session))
    }

    pub async fn start(&self, id: SessionId) -> Result<(), LiveSessionError> {
        self.transition(id, SessionTransition::Start).await
    }

    pub async fn end(&self, id: SessionId) -> Result<(), LiveSessionError> {
        self.transition(id, SessionTransition::End).await
    }

    async fn transition(
        &self,
        id: SessionId,
        transition: SessionTransition,
    ) -> Result<(), LiveSessionError> {
        if !self.repo.transition_by_id(id, transition).await? {
            return Err(LiveSessionError::InvalidTransition {
                id,
                expected: transition.from_status(),
            });
        }
        tracing::info!(
            session_id = %id,
            status = %transition.to_status(),
            "Live session transitioned"
        );
        Ok(())
    }

    /// Applies a status event reported by the media server. Unknown keys and
    /// events arriving in the wrong state are ignored so redelivery is harmless.
    pub async fn apply_external_status(
        &self,
        stream_key: &str,
        event: StreamEvent,
    ) -> Result<CallbackOutcome, LiveSessionError> {
        let transition = event.transition();
        if self
            .repo
            .transition_by_stream_key(stream_key, transition)
            .await?
        {
            tracing::info!(
                stream_key,
                status = %transition.to_status(),
                "Live session transitioned by media server"
            );
            return Ok(CallbackOutcome::Applied(transition));
        }

        tracing::debug!(
            stream_key,
            event = ?event,
            "Ignoring media server event with no matching session in expected state"
        );
        Ok(CallbackOutcome::Ignored)
    }

    fn to_response(&self, session: LiveSession) -> LiveSessionResponse {
        let play_urls = playback_urls_for(&self.playback, &session);
        LiveSessionResponse::new(session, play_urls)
    }
}
