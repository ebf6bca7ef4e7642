// Sliding-window PMI coherence: the default coherence oracle.
//
// Pipeline, per topic:
//   1. segmentation: every ordered pair (w', w*) of distinct positions among
//      the topic's top-n ids
//   2. probabilities: boolean sliding-window counts over the corpus
//   3. confirmation: PMI or NPMI of each pair
//   4. aggregation: mean over the topic's pairs
//
// With N windows and EPSILON smoothing the co-occurrence probability:
//
//   pmi(w', w*)  = ln((P(w', w*) + EPSILON) / (P(w') * P(w*)))
//   npmi(w', w*) = pmi(w', w*) / -ln(P(w', w*) + EPSILON)
//
// A topic with fewer than two ids has no pairs and scores NaN.

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use super::traits::{CoherenceMeasure, CoherenceOracle, CoherenceRequest};
use super::window::WindowCounts;
use crate::measures::traits::mean;

/// Default sliding window width for NPMI / UCI.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Smoothing added to co-occurrence probabilities so unseen pairs stay finite.
pub const EPSILON: f64 = 1e-12;

/// Boolean sliding-window coherence oracle.
#[derive(Debug, Clone)]
pub struct WindowedCoherence {
    pub window_size: usize,
}

impl Default for WindowedCoherence {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl WindowedCoherence {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }
}

impl CoherenceOracle for WindowedCoherence {
    fn coherence_per_topic(&self, request: &CoherenceRequest<'_>) -> Result<Vec<f64>> {
        if self.window_size == 0 {
            anyhow::bail!("coherence window size must be at least 1");
        }

        let topic_ids = request
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| topic_to_ids(i, topic, request))
            .collect::<Result<Vec<_>>>()?;

        let segments: Vec<Vec<(usize, usize)>> =
            topic_ids.iter().map(|ids| segment_one_one(ids)).collect();

        let relevant: HashSet<usize> = segments
            .iter()
            .flatten()
            .flat_map(|&(a, b)| [a, b])
            .collect();

        let counts = WindowCounts::accumulate(
            request.texts,
            request.dictionary,
            &relevant,
            self.window_size,
        );

        if counts.num_windows() == 0 && segments.iter().any(|s| !s.is_empty()) {
            anyhow::bail!("corpus has no window containing any topic word");
        }

        debug!(
            topics = segments.len(),
            relevant = relevant.len(),
            windows = counts.num_windows(),
            window_size = self.window_size,
            measure = %request.measure,
            "Accumulated sliding-window counts"
        );

        Ok(segments
            .iter()
            .map(|pairs| {
                let confirmed: Vec<f64> = pairs
                    .iter()
                    .map(|&(w_prime, w_star)| confirm(&counts, w_prime, w_star, request.measure))
                    .collect();
                mean(&confirmed)
            })
            .collect())
    }
}

/// Map a topic's words to dictionary ids, dropping unknown words, and keep
/// the first `topn` that remain.
fn topic_to_ids(index: usize, topic: &[String], request: &CoherenceRequest<'_>) -> Result<Vec<usize>> {
    let ids: Vec<usize> = topic
        .iter()
        .filter_map(|word| request.dictionary.id(word))
        .take(request.topn)
        .collect();

    if ids.is_empty() {
        anyhow::bail!(
            "unable to interpret topic {index}: none of its words are in the corpus dictionary"
        );
    }
    Ok(ids)
}

/// Every ordered pair of distinct positions in the topic.
fn segment_one_one(ids: &[usize]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1));
    for (i, &w_prime) in ids.iter().enumerate() {
        for (j, &w_star) in ids.iter().enumerate() {
            if i != j {
                pairs.push((w_prime, w_star));
            }
        }
    }
    pairs
}

fn confirm(counts: &WindowCounts, w_prime: usize, w_star: usize, measure: CoherenceMeasure) -> f64 {
    let n = counts.num_windows() as f64;
    let p_prime = counts.occurrences(w_prime) as f64 / n;
    let p_star = counts.occurrences(w_star) as f64 / n;
    let p_joint = counts.co_occurrences(w_prime, w_star) as f64 / n;

    let pmi = ((p_joint + EPSILON) / (p_prime * p_star)).ln();

    match measure {
        CoherenceMeasure::CUci => pmi,
        CoherenceMeasure::CNpmi => pmi / -(p_joint + EPSILON).ln(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherence::dictionary::Dictionary;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(String::from).collect())
            .collect()
    }

    fn run(
        oracle: &WindowedCoherence,
        topics: &[Vec<String>],
        texts: &[Vec<String>],
        topn: usize,
        measure: CoherenceMeasure,
    ) -> Result<Vec<f64>> {
        let dictionary = Dictionary::from_documents(texts);
        oracle.coherence_per_topic(&CoherenceRequest {
            topics,
            texts,
            dictionary: &dictionary,
            topn,
            measure,
        })
    }

    #[test]
    fn test_segment_one_one_counts() {
        assert_eq!(segment_one_one(&[1, 2, 3]).len(), 6);
        assert!(segment_one_one(&[1]).is_empty());
        assert_eq!(segment_one_one(&[4, 5]), vec![(4, 5), (5, 4)]);
    }

    #[test]
    fn test_always_together_scores_one() {
        // a/b share one window, c/d the other: P(joint) = P(each) = 0.5
        let texts = docs(&["a b", "c d"]);
        let topics = docs(&["a b", "c d"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        for s in scores {
            assert!((s - 1.0).abs() < 1e-9, "got {s}");
        }
    }

    #[test]
    fn test_never_together_is_strongly_negative() {
        let texts = docs(&["a x", "b y"]);
        let topics = docs(&["a b"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        assert!(scores[0] < -0.9, "got {}", scores[0]);
    }

    #[test]
    fn test_uci_is_unnormalized() {
        // 3 windows: P(a) = P(b) = 2/3, P(a, b) = 1/3
        let texts = docs(&["a b", "a x", "b y"]);
        let topics = docs(&["a b"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CUci,
        )
        .unwrap();
        // ln((1/3) / (4/9)) = ln 0.75
        assert!((scores[0] - 0.75f64.ln()).abs() < 1e-9, "got {}", scores[0]);
    }

    #[test]
    fn test_single_word_topic_is_nan() {
        let texts = docs(&["a b", "a c"]);
        let topics = docs(&["a", "a"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            1,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        assert!(scores.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_unknown_words_are_skipped() {
        // "zzz" is not in the corpus; the topic falls back to its known words.
        // The second topic keeps "c d" relevant so both documents count.
        let texts = docs(&["a b", "c d"]);
        let topics = docs(&["zzz a b", "c d"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        assert!((scores[0] - 1.0).abs() < 1e-9, "got {}", scores[0]);

        let known_only = run(
            &WindowedCoherence::default(),
            &docs(&["a b", "c d"]),
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        assert_eq!(scores, known_only);
    }

    #[test]
    fn test_pair_in_every_window_scores_minus_one() {
        // "c d" holds no topic word and is skipped, leaving a single window
        // where P(a) = P(b) = P(a, b) = 1
        let texts = docs(&["a b", "c d"]);
        let topics = docs(&["a b"]);
        let scores = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        )
        .unwrap();
        assert!((scores[0] + 1.0).abs() < 1e-9, "got {}", scores[0]);
    }

    #[test]
    fn test_topic_without_known_words_fails() {
        let texts = docs(&["a b"]);
        let topics = docs(&["x y"]);
        let result = run(
            &WindowedCoherence::default(),
            &topics,
            &texts,
            2,
            CoherenceMeasure::CNpmi,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_window_fails() {
        let texts = docs(&["a b"]);
        let topics = docs(&["a b"]);
        let result = run(&WindowedCoherence::new(0), &topics, &texts, 2, CoherenceMeasure::CNpmi);
        assert!(result.is_err());
    }

    #[test]
    fn test_aggregate_is_mean_of_topics() {
        let texts = docs(&["a b", "c d"]);
        let topics = docs(&["a b", "c d"]);
        let dictionary = Dictionary::from_documents(&texts);
        let oracle = WindowedCoherence::default();
        let request = CoherenceRequest {
            topics: &topics,
            texts: &texts,
            dictionary: &dictionary,
            topn: 2,
            measure: CoherenceMeasure::CNpmi,
        };
        let total = oracle.coherence(&request).unwrap();
        assert!((total - 1.0).abs() < 1e-9, "got {total}");
    }
}
