// Topic diversity: the share of unique words across all topics' top-k.
//
//   diversity = |union of top-k prefixes| / (topk * topic_count)
//
// 1.0 means no word repeats anywhere in the top-k lists; values near
// 1/topic_count mean the topics are near copies of each other.

use std::collections::HashSet;

use tracing::debug;

use super::error::Result;
use super::traits::{validate_topk, Measure, TopicList};

/// Default `topk` for topic diversity.
pub const DEFAULT_TOPK: usize = 25;

/// Scores how many distinct words the topics' top-k lists cover.
pub struct TopicDiversity {
    topics: TopicList,
}

impl TopicDiversity {
    pub fn new(topics: TopicList) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Vec<String>] {
        &self.topics
    }

    /// Fraction of unique words among every topic's top-`topk` words.
    pub fn score(&self, topk: usize) -> Result<f64> {
        validate_topk(&self.topics, topk)?;

        let unique: HashSet<&str> = self
            .topics
            .iter()
            .flat_map(|t| t[..topk].iter().map(String::as_str))
            .collect();

        let diversity = unique.len() as f64 / (topk * self.topics.len()) as f64;

        debug!(
            topics = self.topics.len(),
            topk,
            unique = unique.len(),
            diversity,
            "Computed topic diversity"
        );

        Ok(diversity)
    }
}

impl Measure for TopicDiversity {
    fn name(&self) -> &'static str {
        "diversity"
    }

    fn default_topk(&self) -> usize {
        DEFAULT_TOPK
    }

    fn evaluate(&self, topk: usize) -> Result<f64> {
        self.score(topk)
    }
}
