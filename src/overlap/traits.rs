// Rank overlap primitive trait: swap-ready abstraction.
//
// Like the CoherenceOracle and EmbeddingProvider traits, this lets a caller
// plug in a different overlap statistic without touching the measure that
// averages it over topic pairs.

use anyhow::Result;
use serde::Serialize;

/// The three RBO components for a pair of ranked lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RboScore {
    /// Lower bound on the infinite-depth overlap
    pub min: f64,
    /// Residual uncertainty left by the unseen tail
    pub residual: f64,
    /// Point estimate of the overlap extrapolated to infinite depth
    pub extrapolated: f64,
}

/// Trait for comparing two ranked lists.
pub trait RankOverlap {
    /// Compare two ranked lists with persistence `p`.
    fn rbo(&self, list1: &[String], list2: &[String], p: f64) -> Result<RboScore>;
}
