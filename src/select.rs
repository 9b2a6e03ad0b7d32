//! Zone selection and ranking
//!
//! Scored clusters are stable-sorted descending, truncated by the selection
//! policy, and assigned 1-based ranks.

use crate::cluster::Cluster;
use crate::zone::{Zone, ZoneSummary};
use crate::{Candidate, ScoringFormula};

/// How many scored clusters survive as zones
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionPolicy {
    /// Fixed count
    TopK(usize),
    /// Fraction of the cluster count in (0, 1], with a floor of 1 whenever
    /// any clusters exist
    TopFraction(f64),
}

impl SelectionPolicy {
    /// Zone cap for a given cluster count
    #[inline]
    pub fn cap(&self, cluster_count: usize) -> usize {
        match *self {
            Self::TopK(k) => k,
            Self::TopFraction(p) => {
                if cluster_count == 0 {
                    0
                } else {
                    ((cluster_count as f64 * p).floor() as usize).max(1)
                }
            }
        }
    }
}

/// Score, rank, and truncate clusters into zones
///
/// The sort is stable: clusters with equal scores keep their discovery
/// order. An empty cluster list yields an empty zone list, not an error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn rank_zones(
    clusters: Vec<Cluster>,
    candidates: &[Candidate],
    formula: ScoringFormula,
    policy: SelectionPolicy,
) -> Vec<Zone> {
    let high_confidence = formula.high_confidence_threshold();

    let mut scored: Vec<(f64, Cluster, ZoneSummary)> = clusters
        .into_iter()
        .map(|cluster| {
            let metrics = cluster.metrics(candidates, high_confidence);
            let score = formula.score(&metrics);
            let summary = ZoneSummary {
                member_count: metrics.member_count,
                high_confidence_count: metrics.high_confidence_count,
                mean_probability: metrics.mean_probability,
            };
            (score, cluster, summary)
        })
        .collect();

    // sort_by is stable, so equal scores keep discovery order. total_cmp
    // keeps the comparator total even though scores are finite in practice.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let cap = policy.cap(scored.len());
    scored.truncate(cap);

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (score, cluster, summary))| Zone {
            rank: i + 1,
            score,
            center: cluster.center,
            member_ids: cluster.member_ids(candidates),
            summary,
        })
        .collect()
}
