// Term dictionary built from a tokenized corpus.
//
// Ids are handed out in order of first appearance, document by document.
// Tokens first seen in the same document are numbered in lexicographic order,
// so the same corpus always yields the same ids.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

/// Token <-> integer id mapping with document frequencies.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    /// Number of documents each id appears in
    dfs: Vec<usize>,
    num_docs: usize,
    /// Total number of tokens processed
    num_pos: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from every document of a corpus.
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut dictionary = Self::new();
        dictionary.add_documents(documents);
        dictionary
    }

    pub fn add_documents(&mut self, documents: &[Vec<String>]) {
        for document in documents {
            self.add_document(document);
        }

        debug!(
            tokens = self.id2token.len(),
            documents = self.num_docs,
            positions = self.num_pos,
            "Built corpus dictionary"
        );
    }

    fn add_document(&mut self, document: &[String]) {
        let unique: BTreeSet<&str> = document.iter().map(String::as_str).collect();

        for token in unique {
            let id = match self.token2id.get(token) {
                Some(&id) => id,
                None => {
                    let id = self.id2token.len();
                    self.token2id.insert(token.to_string(), id);
                    self.id2token.push(token.to_string());
                    self.dfs.push(0);
                    id
                }
            };
            self.dfs[id] += 1;
        }

        self.num_docs += 1;
        self.num_pos += document.len();
    }

    /// Id of a token, if the corpus contains it.
    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    /// Number of documents containing the token with this id.
    pub fn doc_freq(&self, id: usize) -> usize {
        self.dfs.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_pos(&self) -> usize {
        self.num_pos
    }
}
