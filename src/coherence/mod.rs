// Corpus coherence: dictionary, sliding-window statistics and the oracle
// that turns them into NPMI / UCI topic coherence.

pub mod dictionary;
pub mod traits;
pub mod window;
pub mod windowed;
