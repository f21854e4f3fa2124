use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{LiveSessionRepository, QuestionRepository, QuestionRepositoryTrait},
    services::{
        health::{DatabaseHealth, HealthCheck},
        live_session::LiveSessionService,
        streaming_backend::StreamingBackend,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub live_sessions: Arc<LiveSessionService>,
    pub questions: Arc<dyn QuestionRepositoryTrait>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(
        config: Config,
        live_sessions: Arc<LiveSessionService>,
        questions: Arc<dyn QuestionRepositoryTrait>,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            live_sessions,
            questions,
            health,
        }
    }

    /// Wires PostgreSQL-backed repositories around `pool`.
    pub fn from_pool(pool: DbPool, config: Config, backend: Arc<dyn StreamingBackend>) -> Self {
        let live_sessions = LiveSessionService::new(
            Arc::new(LiveSessionRepository::new(pool.clone())),
            backend,
            config.streaming.playback.clone(),
        );
        Self::new(
            config,
            Arc::new(live_sessions),
            Arc::new(QuestionRepository::new(pool.clone())),
            Arc::new(DatabaseHealth::new(pool)),
        )
    }
}
