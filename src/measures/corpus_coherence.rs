// Corpus coherence: NPMI topic coherence against a reference corpus.
//
// This measure only orchestrates: it builds the corpus dictionary and asks
// the coherence oracle for the aggregate score. Oracle failures (unknown
// topic words, an empty corpus) come back unchanged as ExternalService.

use tracing::debug;

use super::error::Result;
use super::traits::{validate_topk, Measure, TopicList};
use crate::coherence::dictionary::Dictionary;
use crate::coherence::traits::{CoherenceMeasure, CoherenceOracle, CoherenceRequest};
use crate::coherence::windowed::WindowedCoherence;

/// Default `topk` for corpus coherence.
pub const DEFAULT_TOPK: usize = 25;

/// Scores topics by how often their top words co-occur in a corpus.
pub struct CorpusCoherence {
    topics: TopicList,
    texts: Vec<Vec<String>>,
    measure: CoherenceMeasure,
    oracle: Box<dyn CoherenceOracle>,
}

impl CorpusCoherence {
    pub fn new(topics: TopicList, texts: Vec<Vec<String>>) -> Self {
        Self {
            topics,
            texts,
            measure: CoherenceMeasure::CNpmi,
            oracle: Box::new(WindowedCoherence::default()),
        }
    }

    /// Swap in a different coherence oracle.
    pub fn with_oracle(mut self, oracle: Box<dyn CoherenceOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_measure(mut self, measure: CoherenceMeasure) -> Self {
        self.measure = measure;
        self
    }

    pub fn measure(&self) -> CoherenceMeasure {
        self.measure
    }

    /// Aggregate coherence of the topics' top-`topk` words.
    pub fn score(&self, topk: usize) -> Result<f64> {
        validate_topk(&self.topics, topk)?;
        let dictionary = Dictionary::from_documents(&self.texts);
        let score = self.oracle.coherence(&self.request(&dictionary, topk))?;

        debug!(
            topics = self.topics.len(),
            documents = self.texts.len(),
            topk,
            measure = %self.measure,
            score,
            "Computed corpus coherence"
        );

        Ok(score)
    }

    /// Coherence of each topic, in topic order.
    pub fn score_per_topic(&self, topk: usize) -> Result<Vec<f64>> {
        validate_topk(&self.topics, topk)?;
        let dictionary = Dictionary::from_documents(&self.texts);
        Ok(self
            .oracle
            .coherence_per_topic(&self.request(&dictionary, topk))?)
    }

    fn request<'a>(&'a self, dictionary: &'a Dictionary, topk: usize) -> CoherenceRequest<'a> {
        CoherenceRequest {
            topics: &self.topics,
            texts: &self.texts,
            dictionary,
            topn: topk,
            measure: self.measure,
        }
    }
}

impl Measure for CorpusCoherence {
    fn name(&self) -> &'static str {
        "npmi"
    }

    fn default_topk(&self) -> usize {
        DEFAULT_TOPK
    }

    fn evaluate(&self, topk: usize) -> Result<f64> {
        self.score(topk)
    }
}
