// Measure trait: the shared contract of every scorer.
//
// Each scorer is constructed once with its topic list and then scored any
// number of times with different parameters. The trait gives the CLI a single
// way to run any measure with its per-measure default `topk`; the scorers also
// expose inherent `score` methods taking their full parameter set.

use super::error::{MeasureError, Result};

/// Ordered topics, each an ordered list of words ranked most-likely-first.
pub type TopicList = Vec<Vec<String>>;

/// Trait for a topic-model evaluation measure.
pub trait Measure {
    /// Short machine-readable name ("diversity", "npmi", ...).
    fn name(&self) -> &'static str;

    /// The `topk` used when the caller does not pick one.
    fn default_topk(&self) -> usize;

    /// Score the topics on their top-`topk` words using the scorer's
    /// configured parameters.
    fn evaluate(&self, topk: usize) -> Result<f64>;

    /// Score with the measure's default `topk`.
    fn evaluate_default(&self) -> Result<f64> {
        self.evaluate(self.default_topk())
    }
}

/// Check that `topk` can be served by every topic.
///
/// All topics are checked, not just the first, so a short topic further down
/// the list fails here instead of producing a silently truncated score.
pub fn validate_topk(topics: &[Vec<String>], topk: usize) -> Result<()> {
    if topics.is_empty() {
        return Err(MeasureError::NoTopics);
    }
    if topk == 0 {
        return Err(MeasureError::InvalidParameter(
            "topk must be at least 1".to_string(),
        ));
    }

    if let Some((topic, words)) = topics.iter().enumerate().find(|(_, t)| t.len() < topk) {
        return Err(MeasureError::InsufficientTopicLength {
            topic,
            len: words.len(),
            topk,
        });
    }

    Ok(())
}

/// Whether every topic has at least `topk` words.
pub fn serves_topk(topics: &[Vec<String>], topk: usize) -> bool {
    validate_topk(topics, topk).is_ok()
}

/// Arithmetic mean. An empty slice has no mean and yields NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
