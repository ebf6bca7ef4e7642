use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use topiceval::coherence::windowed::DEFAULT_WINDOW_SIZE;
use topiceval::embeddings::download::{default_data_dir, default_embedding_path};
use topiceval::embeddings::provider::FileEmbeddingProvider;
use topiceval::embeddings::traits::EmbeddingSource;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags take precedence over everything here.
pub struct Config {
    /// Data directory holding downloaded embeddings (TOPICEVAL_DATA_DIR)
    pub data_dir: PathBuf,
    /// Word vector file; unset means the default pretrained vectors
    pub embeddings: Option<PathBuf>,
    /// Whether `embeddings` is binary word2vec
    pub embeddings_binary: bool,
    /// Read at most this many vectors
    pub embeddings_limit: Option<usize>,
    /// Sliding window for corpus coherence
    pub window_size: usize,
}

impl Config {
    /// Load configuration from environment variables. Everything has a default.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("TOPICEVAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let embeddings_binary = matches!(
            env::var("TOPICEVAL_EMBEDDINGS_BINARY").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        let embeddings_limit = match env::var("TOPICEVAL_EMBEDDINGS_LIMIT") {
            Ok(raw) => Some(
                raw.parse::<usize>()
                    .with_context(|| format!("TOPICEVAL_EMBEDDINGS_LIMIT is not a number: {raw}"))?,
            ),
            Err(_) => None,
        };

        let window_size = match env::var("TOPICEVAL_WINDOW_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("TOPICEVAL_WINDOW_SIZE is not a number: {raw}"))?,
            Err(_) => DEFAULT_WINDOW_SIZE,
        };

        Ok(Self {
            data_dir,
            embeddings: env::var("TOPICEVAL_EMBEDDINGS").ok().map(PathBuf::from),
            embeddings_binary,
            embeddings_limit,
            window_size,
        })
    }

    /// The embedding source, preferring a command-line path over the env var.
    pub fn embedding_source(&self, flag: Option<PathBuf>) -> EmbeddingSource {
        match flag.or_else(|| self.embeddings.clone()) {
            Some(path) => EmbeddingSource::File(path),
            None => EmbeddingSource::Default,
        }
    }

    /// A provider reading the default vectors from the configured data directory.
    pub fn embedding_provider(&self) -> FileEmbeddingProvider {
        FileEmbeddingProvider::new(
            default_embedding_path(&self.data_dir),
            self.embeddings_limit,
        )
    }
}
