// Topic-model evaluation measures.
//
// Four independent scorers share one contract: construct with the topic list,
// then score as often as needed. The coherence and overlap scorers delegate
// their statistics to pluggable backends (see coherence/, embeddings/ and
// overlap/).

pub mod corpus_coherence;
pub mod diversity;
pub mod embedding_coherence;
pub mod error;
pub mod ranked_overlap;
pub mod traits;

pub use corpus_coherence::CorpusCoherence;
pub use diversity::TopicDiversity;
pub use embedding_coherence::EmbeddingCoherence;
pub use error::MeasureError;
pub use ranked_overlap::RankedOverlap;
pub use traits::{Measure, TopicList};
