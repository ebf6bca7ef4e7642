// Word vectors in the word2vec file format.
//
// Both layouts start with a `<count> <dim>` header line:
//   text:   one `word v1 v2 ... vdim` line per word
//   binary: word bytes up to a space, then dim little-endian f32 values,
//           usually followed by a newline
//
// Gzip-compressed files are detected by their magic bytes and decompressed
// on the fly, so the pretrained `.bin.gz` can be read as downloaded.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::traits::WordSimilarity;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Upper bounds on what is reserved up front. The header is not trusted
/// beyond these; larger files grow as they are read.
const PREALLOC_WORDS: usize = 1 << 16;
const PREALLOC_VALUES: usize = 1 << 22;

/// A vocabulary of dense word vectors, stored row-major in one buffer.
#[derive(Debug, Clone, Default)]
pub struct KeyedVectors {
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
    /// L2 norm of each row, precomputed for cosine similarity
    norms: Vec<f64>,
    dim: usize,
}

impl KeyedVectors {
    /// Build a vocabulary from in-memory vectors. All vectors must share one
    /// dimension; a repeated word keeps its first vector.
    pub fn from_vectors(entries: Vec<(String, Vec<f32>)>) -> Result<Self> {
        let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut kv = Self::with_capacity(entries.len(), dim)?;
        for (word, vector) in entries {
            if vector.len() != dim {
                anyhow::bail!(
                    "vector for '{}' has {} dimensions, expected {}",
                    word,
                    vector.len(),
                    dim
                );
            }
            kv.push(word, &vector);
        }
        Ok(kv)
    }

    /// Read a word2vec text or binary file, optionally only its first
    /// `limit` vectors.
    pub fn load_word2vec_format(path: &Path, binary: bool, limit: Option<usize>) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open word vectors: {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let compressed = reader
            .fill_buf()
            .with_context(|| format!("Failed to read {}", path.display()))?
            .starts_with(&GZIP_MAGIC);

        let parsed = if compressed {
            debug!("Reading gzip-compressed vectors from {}", path.display());
            Self::from_reader(BufReader::new(GzDecoder::new(reader)), binary, limit)
        } else {
            Self::from_reader(reader, binary, limit)
        };
        let kv = parsed
            .with_context(|| format!("Failed to parse word vectors from {}", path.display()))?;

        info!(
            words = kv.len(),
            dim = kv.dim(),
            binary,
            "Loaded word vectors from {}",
            path.display()
        );

        Ok(kv)
    }

    /// Parse word2vec data from any buffered reader.
    pub fn from_reader<R: BufRead>(mut reader: R, binary: bool, limit: Option<usize>) -> Result<Self> {
        let mut header = String::new();
        reader.read_line(&mut header).context("Missing word2vec header")?;
        let (count, dim) = parse_header(&header)?;
        let count = limit.map_or(count, |l| l.min(count));

        let mut kv = Self::with_capacity(count, dim)?;
        for line_no in 0..count {
            let entry = if binary {
                read_binary_entry(&mut reader, dim)
            } else {
                read_text_entry(&mut reader, dim)
            };
            let (word, vector) =
                entry.with_context(|| format!("Bad entry {} of {}", line_no + 1, count))?;
            kv.push(word, &vector);
        }

        Ok(kv)
    }

    fn with_capacity(count: usize, dim: usize) -> Result<Self> {
        if count.checked_mul(dim).is_none() {
            anyhow::bail!("{count} vectors of size {dim} overflow the address space");
        }
        let words = count.min(PREALLOC_WORDS);
        let values = (words * dim).min(PREALLOC_VALUES);

        Ok(Self {
            index: HashMap::with_capacity(words),
            vectors: Vec::with_capacity(values),
            norms: Vec::with_capacity(words),
            dim,
        })
    }

    fn push(&mut self, word: String, vector: &[f32]) {
        if self.index.contains_key(&word) {
            debug!(word = %word, "Duplicate word in vectors, keeping the first");
            return;
        }
        let norm = vector
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt();
        self.index.insert(word, self.norms.len());
        self.vectors.extend_from_slice(vector);
        self.norms.push(norm);
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    /// Vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The vector of a word, if known.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        Some(&self.vectors[row * self.dim..(row + 1) * self.dim])
    }
}

impl WordSimilarity for KeyedVectors {
    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Cosine similarity in [-1, 1]. A zero vector is similar to nothing (0.0).
    fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let row_a = *self.index.get(a)?;
        let row_b = *self.index.get(b)?;

        let denom = self.norms[row_a] * self.norms[row_b];
        if denom < f64::EPSILON {
            return Some(0.0);
        }

        let va = &self.vectors[row_a * self.dim..(row_a + 1) * self.dim];
        let vb = &self.vectors[row_b * self.dim..(row_b + 1) * self.dim];
        let dot: f64 = va
            .iter()
            .zip(vb)
            .map(|(&x, &y)| f64::from(x) * f64::from(y))
            .sum();

        Some((dot / denom).clamp(-1.0, 1.0))
    }
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let count = parts
        .next()
        .context("Header is empty")?
        .parse::<usize>()
        .context("Header vocabulary size is not a number")?;
    let dim = parts
        .next()
        .context("Header is missing the vector size")?
        .parse::<usize>()
        .context("Header vector size is not a number")?;
    Ok((count, dim))
}

fn read_text_entry<R: BufRead>(reader: &mut R, dim: usize) -> Result<(String, Vec<f32>)> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        anyhow::bail!("unexpected end of file");
    }

    let mut parts = line.split_whitespace();
    let word = parts.next().context("empty line")?.to_string();
    let vector = parts
        .map(|v| v.parse::<f32>().with_context(|| format!("bad value '{v}'")))
        .collect::<Result<Vec<f32>>>()?;

    if vector.len() != dim {
        anyhow::bail!(
            "'{}' has {} values, header says {}",
            word,
            vector.len(),
            dim
        );
    }
    Ok((word, vector))
}

fn read_binary_entry<R: BufRead>(reader: &mut R, dim: usize) -> Result<(String, Vec<f32>)> {
    let mut word_bytes = Vec::new();
    reader.read_until(b' ', &mut word_bytes)?;
    if word_bytes.last() != Some(&b' ') {
        anyhow::bail!("unexpected end of file");
    }
    word_bytes.pop();

    // The newline closing the previous vector lands in front of this word
    let start = word_bytes
        .iter()
        .position(|&b| b != b'\n')
        .unwrap_or(word_bytes.len());
    let word = String::from_utf8(word_bytes[start..].to_vec()).context("word is not UTF-8")?;

    let len = dim
        .checked_mul(4)
        .with_context(|| format!("vector size {dim} is too large"))?;
    // Read through `take` so a corrupt dimension never sizes the buffer
    let mut raw = Vec::new();
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut raw)
        .with_context(|| format!("Failed to read vector for '{word}'"))?;
    if raw.len() != len {
        anyhow::bail!("truncated vector for '{word}'");
    }
    let vector = raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok((word, vector))
}
