pub mod live_session;
#[cfg(test)]
pub mod memory;
pub mod question;

pub use live_session::{LiveSessionRepository, LiveSessionRepositoryTrait};
pub use question::{QuestionRepository, QuestionRepositoryTrait};
