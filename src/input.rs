// Loading topic lists and corpora from files.
//
// Topics: either a JSON array of arrays of words, or plain text with one
// topic per line (words separated by whitespace, most likely first).
// Corpus: plain text, one already-tokenized document per line.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::measures::TopicList;

/// Read a topic list from a JSON or whitespace-separated text file.
pub fn load_topics(path: &Path) -> Result<TopicList> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read topics file: {}", path.display()))?;
    let topics = parse_topics(&raw)
        .with_context(|| format!("Failed to parse topics file: {}", path.display()))?;

    debug!(topics = topics.len(), "Loaded topics from {}", path.display());
    Ok(topics)
}

/// Parse topics from file contents. Content starting with `[` is JSON.
pub fn parse_topics(raw: &str) -> Result<TopicList> {
    let topics: TopicList = if raw.trim_start().starts_with('[') {
        serde_json::from_str(raw).context("Topics JSON must be an array of arrays of strings")?
    } else {
        tokenize_lines(raw)
    };

    if topics.is_empty() {
        anyhow::bail!("No topics found");
    }
    Ok(topics)
}

/// Read a corpus with one tokenized document per line.
pub fn load_corpus(path: &Path) -> Result<Vec<Vec<String>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let corpus = tokenize_lines(&raw);

    if corpus.is_empty() {
        anyhow::bail!("Corpus file {} has no documents", path.display());
    }

    debug!(documents = corpus.len(), "Loaded corpus from {}", path.display());
    Ok(corpus)
}

/// Split text into lines of whitespace-separated tokens, skipping blank lines.
pub fn tokenize_lines(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .map(|line| line.split_whitespace().map(String::from).collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_topics() {
        let topics = parse_topics(r#"[["a", "b"], ["c", "d"]]"#).unwrap();
        assert_eq!(topics, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_parse_text_topics() {
        let topics = parse_topics("a b c\n\n  d e f  \n").unwrap();
        assert_eq!(topics, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_parse_bad_json_fails() {
        assert!(parse_topics(r#"[["a", 1]]"#).is_err());
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(parse_topics("\n\n").is_err());
    }

    #[test]
    fn test_load_corpus_from_file() {
        let path = std::env::temp_dir().join("topiceval-corpus-test.txt");
        std::fs::write(&path, "the cat sat\n\nthe dog ran\n").unwrap();

        let corpus = load_corpus(&path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[1], vec!["the", "dog", "ran"]);

        // Cleanup
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_topics(Path::new("/nonexistent/topics.json")).is_err());
    }
}
