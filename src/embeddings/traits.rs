// Embedding lookup traits: swap-ready abstraction.
//
// WordSimilarity is a loaded vocabulary that can compare two words.
// EmbeddingProvider turns an EmbeddingSource into one, once per score call.

use std::path::PathBuf;

use anyhow::Result;

/// Where the word vectors come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmbeddingSource {
    /// The standard pretrained vectors (word2vec-google-news-300)
    #[default]
    Default,
    /// A word2vec-format vector file
    File(PathBuf),
}

/// A loaded vocabulary that can compare two of its words.
pub trait WordSimilarity {
    /// Whether the word has a vector.
    fn contains(&self, word: &str) -> bool;

    /// Cosine similarity of two words, or None if either is unknown.
    fn similarity(&self, a: &str, b: &str) -> Option<f64>;
}

/// Trait for loading word vectors from a source.
pub trait EmbeddingProvider: Send + Sync {
    /// Load the vectors. `binary` says whether a user-supplied file is in the
    /// binary word2vec format.
    fn load(&self, source: &EmbeddingSource, binary: bool) -> Result<Box<dyn WordSimilarity>>;
}
