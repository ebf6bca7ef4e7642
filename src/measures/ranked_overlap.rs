// Ranked overlap: mean rank-biased overlap over every pair of topics.
//
// Each unordered pair of topics is truncated to its top-k words and compared
// with the overlap primitive; the extrapolated RBO values are averaged. High
// values mean the topics share their top words in similar order.

use tracing::debug;

use super::error::{MeasureError, Result};
use super::traits::{mean, validate_topk, Measure, TopicList};
use crate::overlap::rbo::RankBiasedOverlap;
use crate::overlap::traits::RankOverlap;

/// Default `topk` for ranked overlap.
pub const DEFAULT_TOPK: usize = 10;

/// Default persistence: agreement at depth d is weighted 0.9^(d-1).
pub const DEFAULT_WEIGHT: f64 = 0.9;

/// Scores how much the topics' ranked word lists agree with each other.
pub struct RankedOverlap {
    topics: TopicList,
    weight: f64,
    primitive: Box<dyn RankOverlap>,
}

impl RankedOverlap {
    pub fn new(topics: TopicList) -> Self {
        Self {
            topics,
            weight: DEFAULT_WEIGHT,
            primitive: Box::new(RankBiasedOverlap),
        }
    }

    /// Set the weight used by `Measure::evaluate`.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Swap in a different overlap primitive.
    pub fn with_primitive(mut self, primitive: Box<dyn RankOverlap>) -> Self {
        self.primitive = primitive;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Mean extrapolated RBO over all unordered topic pairs.
    ///
    /// `weight` is the persistence p in (0, 1]; p -> 1 approaches the
    /// unweighted average overlap. A single topic has no pairs, so the
    /// result is NaN.
    pub fn score(&self, topk: usize, weight: f64) -> Result<f64> {
        validate_topk(&self.topics, topk)?;
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(MeasureError::InvalidParameter(format!(
                "weight must be in (0, 1], got {weight}"
            )));
        }

        let mut collected = Vec::new();
        for (i, first) in self.topics.iter().enumerate() {
            for second in &self.topics[i + 1..] {
                let rbo = self
                    .primitive
                    .rbo(&first[..topk], &second[..topk], weight)?;
                collected.push(rbo.extrapolated);
            }
        }

        let score = mean(&collected);

        debug!(
            pairs = collected.len(),
            topk,
            weight,
            score,
            "Computed mean rank-biased overlap"
        );

        Ok(score)
    }
}

impl Measure for RankedOverlap {
    fn name(&self) -> &'static str {
        "rbo"
    }

    fn default_topk(&self) -> usize {
        DEFAULT_TOPK
    }

    fn evaluate(&self, topk: usize) -> Result<f64> {
        self.score(topk, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::traits::RboScore;

    fn topics(raw: &[&[&str]]) -> TopicList {
        raw.iter()
            .map(|t| t.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    /// Primitive that reports a fixed value, for checking the averaging.
    struct Fixed(f64);

    impl RankOverlap for Fixed {
        fn rbo(&self, _a: &[String], _b: &[String], _p: f64) -> anyhow::Result<RboScore> {
            Ok(RboScore {
                min: 0.0,
                residual: 0.0,
                extrapolated: self.0,
            })
        }
    }

    /// Primitive that always fails.
    struct Broken;

    impl RankOverlap for Broken {
        fn rbo(&self, _a: &[String], _b: &[String], _p: f64) -> anyhow::Result<RboScore> {
            anyhow::bail!("overlap backend unavailable")
        }
    }

    #[test]
    fn test_identical_topics_score_one() {
        let m = RankedOverlap::new(topics(&[&["a", "b", "c"], &["a", "b", "c"]]));
        let score = m.score(3, 0.9).unwrap();
        assert!((score - 1.0).abs() < 1e-10, "got {score}");
    }

    #[test]
    fn test_disjoint_topics_score_zero() {
        let m = RankedOverlap::new(topics(&[&["a", "b"], &["c", "d"], &["e", "f"]]));
        let score = m.score(2, 0.9).unwrap();
        assert!(score.abs() < 1e-12, "got {score}");
    }

    #[test]
    fn test_truncates_to_topk() {
        // Topics only differ past topk
        let m = RankedOverlap::new(topics(&[&["a", "b", "x"], &["a", "b", "y"]]));
        let score = m.score(2, 0.5).unwrap();
        assert!((score - 1.0).abs() < 1e-10, "got {score}");
    }

    #[test]
    fn test_single_topic_is_nan() {
        let m = RankedOverlap::new(topics(&[&["a", "b"]]));
        assert!(m.score(2, 0.9).unwrap().is_nan());
    }

    #[test]
    fn test_averages_over_all_pairs() {
        // Three topics -> three pairs, each reporting 0.25
        let m = RankedOverlap::new(topics(&[&["a"], &["b"], &["c"]]))
            .with_primitive(Box::new(Fixed(0.25)));
        let score = m.score(1, 0.9).unwrap();
        assert!((score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_weight_out_of_range_fails() {
        let m = RankedOverlap::new(topics(&[&["a"], &["b"]]));
        assert!(matches!(
            m.score(1, 0.0),
            Err(MeasureError::InvalidParameter(_))
        ));
        assert!(matches!(
            m.score(1, 1.01),
            Err(MeasureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_primitive_failure_propagates() {
        let m = RankedOverlap::new(topics(&[&["a"], &["b"]])).with_primitive(Box::new(Broken));
        match m.score(1, 0.9) {
            Err(MeasureError::ExternalService(e)) => {
                assert!(e.to_string().contains("unavailable"))
            }
            other => panic!("expected ExternalService, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_uses_configured_weight() {
        let m = RankedOverlap::new(topics(&[&["a", "b"], &["b", "a"]])).with_weight(1.0);
        assert_eq!(m.weight(), 1.0);
        let score = m.evaluate(2).unwrap();
        assert!((score - 1.0).abs() < 1e-12, "got {score}");
    }
}
