//! Live session repository.
//!
//! Every status change is a single conditional `UPDATE` whose `WHERE` clause
//! carries the expected prior status, so the store serializes concurrent
//! transitions and exactly one caller observes an affected row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::live_session::{LiveSession, SessionStatus, SessionTransition};
use crate::types::{CourseId, SessionId};

const TABLE_NAME: &str = "live_sessions";
const SELECT_COLUMNS: &str =
    "id, course_id, stream_key, status, started_at, ended_at, provisioned_at, created_at";

/// Repository trait for live session persistence.
///
/// This trait is designed to be mockable using mockall for testing.
/// Use `MockLiveSessionRepositoryTrait` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveSessionRepositoryTrait: Send + Sync {
    /// Inserts a new session in `pending` state.
    async fn insert_pending(
        &self,
        course_id: CourseId,
        stream_key: &str,
    ) -> Result<LiveSession, sqlx::Error>;

    async fn find_by_id(&self, id: SessionId) -> Result<Option<LiveSession>, sqlx::Error>;

    /// Stamps `provisioned_at` once the media server accepted the stream key.
    /// Returns `false` when the row is gone or was already stamped.
    async fn mark_provisioned(&self, id: SessionId) -> Result<bool, sqlx::Error>;

    /// Applies `transition` to the session with `id`. Returns `false` when no
    /// row matched the id together with the expected prior status.
    async fn transition_by_id(
        &self,
        id: SessionId,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error>;

    /// Same guarded update as [`transition_by_id`](Self::transition_by_id),
    /// keyed by stream key.
    async fn transition_by_stream_key(
        &self,
        stream_key: &str,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error>;

    /// Removes a session row. Returns whether a row was deleted.
    async fn delete(&self, id: SessionId) -> Result<bool, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct LiveSessionRepository {
    pool: PgPool,
}

impl LiveSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn transition_query(key_column: &str, transition: SessionTransition) -> String {
        format!(
            "UPDATE {} SET status = $1, {} = NOW() WHERE {} = $2 AND status = $3",
            TABLE_NAME,
            transition.timestamp_column(),
            key_column
        )
    }

    /// Deletes `pending` sessions created before `created_before` that were
    /// never provisioned, e.g. after a crash between insert and the media
    /// server call. Provisioned sessions waiting for their class are kept.
    pub async fn delete_stale_pending(
        &self,
        created_before: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE status = $1 AND provisioned_at IS NULL AND created_at < $2",
            TABLE_NAME
        );
        let result = sqlx::query(&query)
            .bind(SessionStatus::Pending.as_str())
            .bind(created_before)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LiveSessionRepositoryTrait for LiveSessionRepository {
    async fn insert_pending(
        &self,
        course_id: CourseId,
        stream_key: &str,
    ) -> Result<LiveSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (course_id, stream_key, status) VALUES ($1, $2, $3) RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, LiveSession>(&query)
            .bind(course_id)
            .bind(stream_key)
            .bind(SessionStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<LiveSession>, sqlx::Error> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, TABLE_NAME);
        sqlx::query_as::<_, LiveSession>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn mark_provisioned(&self, id: SessionId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET provisioned_at = NOW() WHERE id = $1 AND provisioned_at IS NULL",
            TABLE_NAME
        );
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_by_id(
        &self,
        id: SessionId,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error> {
        let query = Self::transition_query("id", transition);
        let result = sqlx::query(&query)
            .bind(transition.to_status().as_str())
            .bind(id)
            .bind(transition.from_status().as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_by_stream_key(
        &self,
        stream_key: &str,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error> {
        let query = Self::transition_query("stream_key", transition);
        let result = sqlx::query(&query)
            .bind(transition.to_status().as_str())
            .bind(stream_key)
            .bind(transition.from_status().as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: SessionId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
