// Boolean sliding-window occurrence counts.
//
// Every document is reduced to the ids we care about (other tokens keep their
// position but are masked out) and cut into overlapping windows of
// `window_size` tokens with stride 1. A document no longer than the window is
// one window. Documents without any relevant token are skipped entirely.
//
// Each window counts once: a word's count is the number of windows it appears
// in, a pair's count the number of windows containing both words.

use std::collections::{HashMap, HashSet};

use super::dictionary::Dictionary;

/// Window occurrence and co-occurrence counts for a set of relevant ids.
#[derive(Debug, Clone, Default)]
pub struct WindowCounts {
    num_windows: usize,
    occurrences: HashMap<usize, usize>,
    /// Keyed by (smaller id, larger id)
    co_occurrences: HashMap<(usize, usize), usize>,
}

impl WindowCounts {
    /// Slide a window over every text and count the relevant ids.
    pub fn accumulate(
        texts: &[Vec<String>],
        dictionary: &Dictionary,
        relevant: &HashSet<usize>,
        window_size: usize,
    ) -> Self {
        let mut counts = Self::default();

        for text in texts {
            let masked: Vec<Option<usize>> = text
                .iter()
                .map(|token| dictionary.id(token).filter(|id| relevant.contains(id)))
                .collect();

            if masked.iter().all(Option::is_none) {
                continue;
            }

            if masked.len() <= window_size {
                counts.count_window(&masked);
            } else {
                for window in masked.windows(window_size) {
                    counts.count_window(window);
                }
            }
        }

        counts
    }

    fn count_window(&mut self, window: &[Option<usize>]) {
        let mut unique: Vec<usize> = window.iter().flatten().copied().collect();
        unique.sort_unstable();
        unique.dedup();

        for (i, &a) in unique.iter().enumerate() {
            *self.occurrences.entry(a).or_insert(0) += 1;
            for &b in &unique[i + 1..] {
                *self.co_occurrences.entry((a, b)).or_insert(0) += 1;
            }
        }

        self.num_windows += 1;
    }

    /// Total number of windows seen.
    pub fn num_windows(&self) -> usize {
        self.num_windows
    }

    /// Number of windows containing `id`.
    pub fn occurrences(&self, id: usize) -> usize {
        self.occurrences.get(&id).copied().unwrap_or(0)
    }

    /// Number of windows containing both ids. A word co-occurs with itself
    /// in every window it appears in.
    pub fn co_occurrences(&self, a: usize, b: usize) -> usize {
        if a == b {
            return self.occurrences(a);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        self.co_occurrences.get(&key).copied().unwrap_or(0)
    }
}
