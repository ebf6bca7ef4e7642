// Embedding coherence: mean pairwise word-vector similarity per topic.
//
// For each topic, every unordered pair of its top-k words whose both words
// have vectors contributes its cosine similarity; the topic's coherence is
// the mean of those. The final score is the mean over topics.
//
// A topic with no in-vocabulary pair has no mean and scores NaN, and that NaN
// carries into the final score. It is not treated as 0.0: an unknown topic is
// not an incoherent one. Use `score_per_topic` to find the offending topics.

use tracing::debug;

use super::error::Result;
use super::traits::{mean, validate_topk, Measure, TopicList};
use crate::embeddings::provider::FileEmbeddingProvider;
use crate::embeddings::traits::{EmbeddingProvider, EmbeddingSource, WordSimilarity};

/// Default `topk` for embedding coherence.
pub const DEFAULT_TOPK: usize = 10;

/// Scores topics by how close their top words sit in an embedding space.
pub struct EmbeddingCoherence {
    topics: TopicList,
    source: EmbeddingSource,
    binary: bool,
    provider: Box<dyn EmbeddingProvider>,
}

impl EmbeddingCoherence {
    pub fn new(topics: TopicList) -> Self {
        Self {
            topics,
            source: EmbeddingSource::Default,
            binary: false,
            provider: Box::new(FileEmbeddingProvider::default()),
        }
    }

    pub fn with_source(mut self, source: EmbeddingSource) -> Self {
        self.source = source;
        self
    }

    /// Whether a user-supplied vector file is binary word2vec.
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Swap in a different embedding provider.
    pub fn with_provider(mut self, provider: Box<dyn EmbeddingProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn source(&self) -> &EmbeddingSource {
        &self.source
    }

    /// Mean over topics of the mean pairwise similarity of their top-`topk`
    /// words. NaN if any topic has no in-vocabulary pair.
    pub fn score(&self, topk: usize) -> Result<f64> {
        self.score_with_binary(topk, self.binary)
    }

    /// Like `score`, reading a user-supplied file with the given format flag
    /// instead of the configured one.
    pub fn score_with_binary(&self, topk: usize, binary: bool) -> Result<f64> {
        let per_topic = self.per_topic(topk, binary)?;
        let score = mean(&per_topic);

        debug!(
            topics = per_topic.len(),
            undefined = per_topic.iter().filter(|s| s.is_nan()).count(),
            topk,
            score,
            "Computed embedding coherence"
        );

        Ok(score)
    }

    /// Coherence of each topic, in topic order.
    pub fn score_per_topic(&self, topk: usize) -> Result<Vec<f64>> {
        self.per_topic(topk, self.binary)
    }

    fn per_topic(&self, topk: usize, binary: bool) -> Result<Vec<f64>> {
        validate_topk(&self.topics, topk)?;
        let wv = self.provider.load(&self.source, binary)?;

        Ok(self
            .topics
            .iter()
            .map(|topic| topic_similarity(wv.as_ref(), &topic[..topk]))
            .collect())
    }
}

/// Mean similarity over the unordered pairs of `words` that are both in
/// vocabulary. NaN when there is no such pair.
pub fn topic_similarity(wv: &dyn WordSimilarity, words: &[String]) -> f64 {
    let mut similarities = Vec::new();
    for (i, first) in words.iter().enumerate() {
        for second in &words[i + 1..] {
            if wv.contains(first) && wv.contains(second) {
                if let Some(sim) = wv.similarity(first, second) {
                    similarities.push(sim);
                }
            }
        }
    }
    mean(&similarities)
}

impl Measure for EmbeddingCoherence {
    fn name(&self) -> &'static str {
        "embedding"
    }

    fn default_topk(&self) -> usize {
        DEFAULT_TOPK
    }

    fn evaluate(&self, topk: usize) -> Result<f64> {
        self.score(topk)
    }
}
