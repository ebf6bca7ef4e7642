// Word embeddings: similarity lookup for embedding-based topic coherence.
//
// The WordSimilarity / EmbeddingProvider traits are what EmbeddingCoherence
// scores through. KeyedVectors reads word2vec files; FileEmbeddingProvider
// resolves either a user-supplied file or the default pretrained vectors
// fetched by `topiceval download-embeddings`.

pub mod download;
pub mod keyed_vectors;
pub mod provider;
pub mod traits;
