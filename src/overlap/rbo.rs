// Rank-biased overlap (RBO) for two finite ranked lists.
//
// At each depth d we compare the sets of the first d items of both lists:
//
//   agreement(d) = 2 * |S1[:d] ∩ S2[:d]| / (|S1[:d]| + |S2[:d]|)
//   overlap(d)   = agreement(d) * min(d, |S1|, |S2|)
//
// Agreement at depth d is weighted by p^(d-1). Since the lists are finite,
// the infinite-depth value is not observed: `min` is its lower bound,
// `residual` the width of the remaining uncertainty, and `extrapolated` the
// point estimate that assumes agreement past the shorter list's end holds
// steady. Using agreement rather than overlap/d keeps `extrapolated` within
// [0, 1] when a list repeats an item.

use std::collections::HashSet;

use anyhow::Result;

use super::traits::{RankOverlap, RboScore};

/// Default RBO primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankBiasedOverlap;

impl RankOverlap for RankBiasedOverlap {
    fn rbo(&self, list1: &[String], list2: &[String], p: f64) -> Result<RboScore> {
        rbo(list1, list2, p)
    }
}

/// Compute all three RBO components for two ranked lists.
///
/// `p` must be in (0, 1]. At `p = 1` the bounds involve `ln(0)` and are
/// reported as NaN; the extrapolated estimate is still defined there.
pub fn rbo(list1: &[String], list2: &[String], p: f64) -> Result<RboScore> {
    if !(p > 0.0 && p <= 1.0) {
        anyhow::bail!("RBO persistence p must be in (0, 1], got {p}");
    }
    if list1.is_empty() || list2.is_empty() {
        anyhow::bail!("RBO is undefined for an empty ranked list");
    }

    let table = AgreementTable::new(list1, list2);

    let (min, residual) = if p < 1.0 {
        (rbo_min(&table, p), rbo_residual(&table, p))
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(RboScore {
        min,
        residual,
        extrapolated: rbo_extrapolated(&table, p),
    })
}

/// Prefix-set agreement for every depth from 1 to the longer list's length.
struct AgreementTable {
    /// agreement[d - 1] is the agreement at depth d
    agreement: Vec<f64>,
    /// Length of the shorter list
    short: usize,
    /// Length of the longer list
    long: usize,
}

impl AgreementTable {
    fn new(list1: &[String], list2: &[String]) -> Self {
        let short = list1.len().min(list2.len());
        let long = list1.len().max(list2.len());

        let mut seen1: HashSet<&str> = HashSet::new();
        let mut seen2: HashSet<&str> = HashSet::new();
        let mut shared = 0usize;
        let mut agreement = Vec::with_capacity(long);

        // Grow both prefix sets one rank at a time, keeping the intersection
        // size current. A list that has run out simply stops growing.
        for d in 0..long {
            if let Some(item) = list1.get(d) {
                if seen1.insert(item.as_str()) && seen2.contains(item.as_str()) {
                    shared += 1;
                }
            }
            if let Some(item) = list2.get(d) {
                if seen2.insert(item.as_str()) && seen1.contains(item.as_str()) {
                    shared += 1;
                }
            }
            agreement.push(2.0 * shared as f64 / (seen1.len() + seen2.len()) as f64);
        }

        Self {
            agreement,
            short,
            long,
        }
    }

    fn agreement(&self, depth: usize) -> f64 {
        self.agreement[depth - 1]
    }

    fn overlap(&self, depth: usize) -> f64 {
        self.agreement(depth) * depth.min(self.short) as f64
    }
}

/// sum of p^d / d for d in `from..=to` (empty when from > to)
fn weighted_harmonic(p: f64, from: usize, to: usize) -> f64 {
    (from..=to).map(|d| p.powi(d as i32) / d as f64).sum()
}

fn rbo_min(table: &AgreementTable, p: f64) -> f64 {
    let depth = table.short;
    let x_k = table.overlap(depth);
    let log_term = x_k * (1.0 - p).ln();
    let sum_term: f64 = (1..=depth)
        .map(|d| p.powi(d as i32) / d as f64 * (table.overlap(d) - x_k))
        .sum();
    (1.0 - p) / p * (sum_term - log_term)
}

fn rbo_residual(table: &AgreementTable, p: f64) -> f64 {
    let (s, l) = (table.short, table.long);
    let x_l = table.overlap(l);
    // Overlap can be fractional when a list repeats an item; f is a depth.
    let f = (l as f64 + s as f64 - x_l).ceil().max(0.0) as usize;

    let term1 = s as f64 * weighted_harmonic(p, s + 1, f);
    let term2 = l as f64 * weighted_harmonic(p, l + 1, f);
    let term3 = x_l * ((1.0 / (1.0 - p)).ln() - weighted_harmonic(p, 1, f));

    p.powi(s as i32) + p.powi(l as i32)
        - p.powi(f as i32)
        - (1.0 - p) / p * (term1 + term2 + term3)
}

fn rbo_extrapolated(table: &AgreementTable, p: f64) -> f64 {
    let (s, l) = (table.short, table.long);
    let x_l = table.overlap(l);
    let x_s = table.overlap(s);

    let sum1: f64 = (1..=l)
        .map(|d| p.powi(d as i32) * table.agreement(d))
        .sum();
    let sum2: f64 = (s + 1..=l)
        .map(|d| p.powi(d as i32) * x_s * (d - s) as f64 / s as f64 / d as f64)
        .sum();

    let term1 = (1.0 - p) / p * (sum1 + sum2);
    let term2 = p.powi(l as i32) * ((x_l - x_s) / l as f64 + x_s / s as f64);
    term1 + term2
}
