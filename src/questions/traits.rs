//! Trait abstraction for the question service to enable mocking in tests

use crate::state::Topic;
use async_trait::async_trait;
use thiserror::Error;

/// Why a supplementary question fetch produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("question request failed: {0}")]
    Transport(String),
    #[error("question service returned status {0}")]
    Status(u16),
    #[error("malformed question payload: {0}")]
    Parse(String),
}

/// Source of supplementary questions for a topic.
///
/// Implementations may ignore the topic and return a fixed list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionService: Send + Sync {
    /// Fetch the ordered question list for `topic`
    async fn fetch_questions(&self, topic: Topic) -> Result<Vec<String>, FetchError>;
}
