pub mod health;
pub mod live_session;
pub mod playback;
pub mod streaming_backend;
