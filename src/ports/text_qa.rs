//! Text QA Port - passage question answering.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An answer extracted from candidate passages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
    pub answer: String,
    pub confidence: f64,
    /// The full sentence the answer was extracted from.
    pub answer_sentence: String,
}

/// QA service failure. Always treated as "no answer found" by callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QaError {
    #[error("question answering request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed answer payload: {0}")]
    Malformed(String),
}

/// Port for answering a question over a set of candidate passages.
#[async_trait]
pub trait TextQa: Send + Sync {
    /// Answers `question` from `passages`.
    ///
    /// # Errors
    /// Returns `QaError` on timeout, transport failure or a non-2xx
    /// response; callers degrade to "no factoid answer found".
    async fn answer(&self, question: &str, passages: &[String]) -> Result<QaAnswer, QaError>;
}
