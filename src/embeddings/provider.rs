// File-backed embedding provider.
//
// Resolves an EmbeddingSource to a KeyedVectors vocabulary. The default source
// maps to the pretrained vectors under the data directory; that file is
// always binary word2vec, whatever the caller's `binary` flag says.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use super::download::{default_data_dir, default_embedding_path, DEFAULT_EMBEDDING_NAME};
use super::keyed_vectors::KeyedVectors;
use super::traits::{EmbeddingProvider, EmbeddingSource, WordSimilarity};

/// Loads word2vec files from disk, once per call.
#[derive(Debug, Clone)]
pub struct FileEmbeddingProvider {
    /// Where `EmbeddingSource::Default` is read from
    pub default_path: PathBuf,
    /// Read at most this many vectors from the file
    pub limit: Option<usize>,
}

impl Default for FileEmbeddingProvider {
    fn default() -> Self {
        Self {
            default_path: default_embedding_path(&default_data_dir()),
            limit: None,
        }
    }
}

impl FileEmbeddingProvider {
    pub fn new(default_path: PathBuf, limit: Option<usize>) -> Self {
        Self {
            default_path,
            limit,
        }
    }
}

impl EmbeddingProvider for FileEmbeddingProvider {
    fn load(&self, source: &EmbeddingSource, binary: bool) -> Result<Box<dyn WordSimilarity>> {
        let (path, binary) = match source {
            EmbeddingSource::Default => {
                if !self.default_path.exists() {
                    anyhow::bail!(
                        "Default embedding {} not found: {}\nRun `topiceval download-embeddings` to download it.",
                        DEFAULT_EMBEDDING_NAME,
                        self.default_path.display()
                    );
                }
                (self.default_path.as_path(), true)
            }
            EmbeddingSource::File(path) => (path.as_path(), binary),
        };

        debug!(path = %path.display(), binary, limit = ?self.limit, "Loading word vectors");
        let kv = KeyedVectors::load_word2vec_format(path, binary, self.limit)?;
        Ok(Box::new(kv))
    }
}
