// Coherence oracle trait: swap-ready abstraction.
//
// CorpusCoherence only orchestrates: it builds the dictionary and hands the
// topics and corpus to an oracle. The default oracle is WindowedCoherence;
// anything else that can score topics against a corpus can stand in for it.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use crate::measures::traits::mean;

/// Which direct confirmation measure the oracle applies to word pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoherenceMeasure {
    /// Normalized pointwise mutual information, in [-1, 1]
    #[default]
    #[serde(rename = "c_npmi")]
    CNpmi,
    /// Unnormalized pointwise mutual information
    #[serde(rename = "c_uci")]
    CUci,
}

impl CoherenceMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CNpmi => "c_npmi",
            Self::CUci => "c_uci",
        }
    }
}

impl fmt::Display for CoherenceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoherenceMeasure {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "c_npmi" => Ok(Self::CNpmi),
            "c_uci" => Ok(Self::CUci),
            other => anyhow::bail!("unknown coherence measure '{other}' (expected c_npmi or c_uci)"),
        }
    }
}

/// Everything an oracle needs to score a set of topics.
#[derive(Debug, Clone, Copy)]
pub struct CoherenceRequest<'a> {
    pub topics: &'a [Vec<String>],
    pub texts: &'a [Vec<String>],
    pub dictionary: &'a Dictionary,
    /// How many words of each topic take part
    pub topn: usize,
    pub measure: CoherenceMeasure,
}

/// Trait for scoring topic coherence against a reference corpus.
pub trait CoherenceOracle {
    /// Coherence of each topic, in topic order.
    fn coherence_per_topic(&self, request: &CoherenceRequest<'_>) -> Result<Vec<f64>>;

    /// Aggregate coherence over all topics.
    /// Default implementation is the arithmetic mean of the per-topic values.
    fn coherence(&self, request: &CoherenceRequest<'_>) -> Result<f64> {
        Ok(mean(&self.coherence_per_topic(request)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_round_trips_through_str() {
        for measure in [CoherenceMeasure::CNpmi, CoherenceMeasure::CUci] {
            assert_eq!(measure.as_str().parse::<CoherenceMeasure>().unwrap(), measure);
        }
    }

    #[test]
    fn test_unknown_measure_fails() {
        assert!("u_mass".parse::<CoherenceMeasure>().is_err());
    }

    #[test]
    fn test_default_is_npmi() {
        assert_eq!(CoherenceMeasure::default(), CoherenceMeasure::CNpmi);
    }
}
