// Download helper for the default pretrained word vectors.
//
// The default embedding is word2vec-google-news-300 (~1.6 GB gzipped), taken
// from the gensim-data release. It is stored compressed in a
// platform-appropriate directory (~/.local/share/topiceval/embeddings/ on
// Linux) and read as-is; KeyedVectors decompresses it while loading.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Name of the default pretrained embedding.
pub const DEFAULT_EMBEDDING_NAME: &str = "word2vec-google-news-300";

/// Release asset for the default pretrained embedding.
const DEFAULT_EMBEDDING_URL: &str = "https://github.com/RaRe-Technologies/gensim-data/releases/download/word2vec-google-news-300/word2vec-google-news-300.gz";

/// File name of the default embedding inside the embeddings directory.
const DEFAULT_EMBEDDING_FILE: &str = "word2vec-google-news-300.bin.gz";

/// Returns the default data directory.
/// Uses the platform data directory: ~/.local/share/topiceval/ on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("topiceval")
}

/// Subdirectory of the data directory holding embeddings.
pub fn embeddings_dir(base: &Path) -> PathBuf {
    base.join("embeddings")
}

/// Where the default pretrained embedding lives under `base`.
pub fn default_embedding_path(base: &Path) -> PathBuf {
    embeddings_dir(base).join(DEFAULT_EMBEDDING_FILE)
}

/// Check whether the default pretrained embedding has been downloaded.
pub fn default_embedding_present(base: &Path) -> bool {
    default_embedding_path(base).exists()
}

/// Download the default pretrained embedding into `base`.
///
/// Skips the download if the file already exists. The body is streamed to a
/// `.part` file that is renamed once complete, so an interrupted download is
/// never mistaken for a finished one.
pub async fn download_default_embedding(base: &Path) -> Result<PathBuf> {
    let dir = embeddings_dir(base);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create embeddings directory: {}", dir.display()))?;

    let dest = default_embedding_path(base);
    if dest.exists() {
        info!("Default embedding already exists, skipping");
        println!("  {} (already exists)", DEFAULT_EMBEDDING_FILE);
        return Ok(dest);
    }

    println!("  Downloading {} (~1.6 GB)...", DEFAULT_EMBEDDING_NAME);
    download_file(DEFAULT_EMBEDDING_URL, &dest).await?;
    Ok(dest)
}

/// Stream a single file from a URL to a local path with a progress bar.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .context("Invalid progress bar template")?,
            );
            pb
        }
    };

    let partial = dest.with_extension("part");
    let mut file = File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        pb.inc(chunk.len() as u64);
    }
    file.flush()?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", partial.display()))?;

    pb.finish_and_clear();
    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}
