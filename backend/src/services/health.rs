use async_trait::async_trait;

use crate::db::connection::{ping, DbPool};

/// Readiness check for the backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_database(&self) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct DatabaseHealth {
    pool: DbPool,
}

impl DatabaseHealth {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealth {
    async fn check_database(&self) -> Result<(), sqlx::Error> {
        ping(&self.pool).await
    }
}
