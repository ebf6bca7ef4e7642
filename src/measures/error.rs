// Errors surfaced by the scoring components.
//
// There are two families: precondition failures detected before any work is
// done (topk larger than a topic, bad parameters), and failures that come back
// from a backend (coherence oracle, embedding provider, overlap primitive).
// Backend failures are carried through untouched as `ExternalService`.

use thiserror::Error;

/// Errors for topic-model measures.
#[derive(Error, Debug)]
pub enum MeasureError {
    /// A topic holds fewer words than the requested `topk`.
    #[error("insufficient words for requested topk: topic {topic} has {len} words, topk is {topk}")]
    InsufficientTopicLength {
        topic: usize,
        len: usize,
        topk: usize,
    },

    /// The topic list is empty, so there is nothing to score.
    #[error("no topics to score")]
    NoTopics,

    /// A scoring parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The coherence oracle, embedding provider or overlap primitive failed.
    #[error(transparent)]
    ExternalService(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MeasureError>;
