//! Viewer URL derivation.
//!
//! URLs are a pure function of the stream key and static configuration, so they
//! are recomputed on every read instead of being stored or fetched from the
//! media server.

use crate::config::PlaybackConfig;
use crate::models::live_session::{LiveSession, PlaybackUrls, SessionStatus};

pub fn playback_urls(config: &PlaybackConfig, stream_key: &str) -> PlaybackUrls {
    let host = config.host.trim_end_matches('/');
    let app = config.app.trim_matches('/');
    PlaybackUrls {
        rtmp: format!("rtmp://{}:{}/{}/{}", host, config.rtmp_port, app, stream_key),
        flv: format!("http://{}:{}/{}/{}.flv", host, config.flv_port, app, stream_key),
        hls: format!("http://{}:{}/{}/{}.m3u8", host, config.hls_port, app, stream_key),
    }
}

/// URLs for `session` if, and only if, it is currently live.
pub fn playback_urls_for(config: &PlaybackConfig, session: &LiveSession) -> Option<PlaybackUrls> {
    (session.status == SessionStatus::Live).then(|| playback_urls(config, &session.stream_key))
}
