// Output formatting: terminal display and JSON reports.

pub mod terminal;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The result of running one measure, as printed or serialized by the CLI.
///
/// NaN scores serialize as JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Measure name ("diversity", "npmi", "embedding", "rbo")
    pub measure: String,
    pub topk: usize,
    /// RBO persistence, for the rbo measure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Confirmation measure, for corpus coherence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence: Option<String>,
    pub score: f64,
    /// Per-topic values, for measures that average over topics
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub per_topic: Vec<f64>,
    pub generated_at: DateTime<Utc>,
}

impl ScoreReport {
    pub fn new(measure: &str, topk: usize, score: f64) -> Self {
        Self {
            measure: measure.to_string(),
            topk,
            weight: None,
            coherence: None,
            score,
            per_topic: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_coherence(mut self, coherence: &str) -> Self {
        self.coherence = Some(coherence.to_string());
        self
    }

    pub fn with_per_topic(mut self, per_topic: Vec<f64>) -> Self {
        self.per_topic = per_topic;
        self
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
