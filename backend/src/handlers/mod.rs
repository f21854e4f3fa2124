pub mod health;
pub mod live_sessions;
pub mod questions;
pub mod stream_status;
