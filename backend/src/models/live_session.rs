//! Live session records and the payloads exchanged over the live API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{CourseId, SessionId};

/// Lifecycle state of a live session. Only `pending -> live -> ended` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Live,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Live => "live",
            SessionStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown session status: {0}")]
pub struct UnknownSessionStatus(pub String);

impl FromStr for SessionStatus {
    type Err = UnknownSessionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SessionStatus::Pending),
            "live" => Ok(SessionStatus::Live),
            "ended" => Ok(SessionStatus::Ended),
            other => Err(UnknownSessionStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for SessionStatus {
    type Error = UnknownSessionStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A guarded state change. Each transition names the single status it may
/// start from and the timestamp column it stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Start,
    End,
}

impl SessionTransition {
    pub fn from_status(&self) -> SessionStatus {
        match self {
            SessionTransition::Start => SessionStatus::Pending,
            SessionTransition::End => SessionStatus::Live,
        }
    }

    pub fn to_status(&self) -> SessionStatus {
        match self {
            SessionTransition::Start => SessionStatus::Live,
            SessionTransition::End => SessionStatus::Ended,
        }
    }

    pub(crate) fn timestamp_column(&self) -> &'static str {
        match self {
            SessionTransition::Start => "started_at",
            SessionTransition::End => "ended_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
/// Database representation of a live session.
pub struct LiveSession {
    pub id: SessionId,
    pub course_id: CourseId,
    /// Opaque token naming the stream on the media server.
    pub stream_key: String,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Set once the media server has accepted the stream key.
    pub provisioned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Viewer-facing URLs for a live stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlaybackUrls {
    pub rtmp: String,
    pub flv: String,
    pub hls: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiveSessionResponse {
    pub id: SessionId,
    pub course_id: CourseId,
    pub stream_key: String,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Present only while the session is live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_urls: Option<PlaybackUrls>,
}

impl LiveSessionResponse {
    pub fn new(session: LiveSession, play_urls: Option<PlaybackUrls>) -> Self {
        Self {
            id: session.id,
            course_id: session.course_id,
            stream_key: session.stream_key,
            status: session.status,
            started_at: session.started_at,
            ended_at: session.ended_at,
            created_at: session.created_at,
            play_urls,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
/// Payload for creating a live session.
pub struct CreateLiveSessionRequest {
    #[validate(range(min = 1, message = "course_id must be a positive integer"))]
    pub course_id: i64,
}

/// Event kinds reported by the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    Start,
    Stop,
}

impl StreamEvent {
    /// Unknown event names are not an error; the caller acknowledges and ignores them.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Some(StreamEvent::Start),
            "stop" => Some(StreamEvent::Stop),
            _ => None,
        }
    }

    pub fn transition(&self) -> SessionTransition {
        match self {
            StreamEvent::Start => SessionTransition::Start,
            StreamEvent::Stop => SessionTransition::End,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
/// Status callback body posted by the media server.
pub struct StreamStatusCallback {
    #[serde(rename = "streamPath", alias = "stream_path")]
    #[validate(length(min = 1, max = 512))]
    pub stream_path: String,
    /// Missing or unrecognised values are acknowledged as no-ops.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub status: String,
}
