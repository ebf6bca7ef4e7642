// Rank-biased overlap between ranked word lists.
//
// The RankOverlap trait is the seam the RankedOverlap measure scores through.
// RankBiasedOverlap is the default primitive (Webber, Moffat & Zobel, 2010).

pub mod rbo;
pub mod traits;
