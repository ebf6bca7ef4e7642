// topiceval: evaluation measures for topic models.
//
// This is the library root. `measures` holds the four scorers; the other
// modules are the backends they score through and the file/terminal plumbing
// used by the CLI.

pub mod coherence;
pub mod embeddings;
pub mod input;
pub mod measures;
pub mod output;
pub mod overlap;

