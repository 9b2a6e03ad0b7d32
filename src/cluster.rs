//! Cluster structures referencing into the candidate slice
//!
//! A cluster holds indices into the slice it was grouped from, not owned
//! copies; metrics are resolved against that slice on demand.

use crate::Candidate;
use geo::Point;

/// A spatially grouped set of candidates, pre-ranking
///
/// Clusters are a pure function of (candidate slice, policy parameters):
/// recomputed from scratch on every run, disjoint in membership within a run,
/// never mutated incrementally.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Indices into the candidate slice this cluster was grouped from
    pub members: Vec<usize>,
    /// Arithmetic-mean centroid of member locations
    pub center: Point<f64>,
}

/// Per-cluster metrics feeding the scoring formulas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterMetrics {
    /// Total member count
    pub member_count: usize,
    /// Members at/above the formula's high-confidence sub-threshold
    pub high_confidence_count: usize,
    /// Mean probability across members
    pub mean_probability: f64,
}

impl Cluster {
    /// Number of member candidates
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Resolve member indices to candidate IDs
    pub fn member_ids(&self, candidates: &[Candidate]) -> Vec<u64> {
        self.members
            .iter()
            .filter_map(|&i| candidates.get(i).map(|c| c.id))
            .collect()
    }

    /// Compute metrics against the candidate slice this cluster indexes into
    ///
    /// `high_confidence` is the sub-threshold (0.8 or 0.9 depending on the
    /// active scoring formula); the comparison is inclusive.
    pub fn metrics(&self, candidates: &[Candidate], high_confidence: f64) -> ClusterMetrics {
        let mut high_confidence_count = 0usize;
        let mut probability_sum = 0.0f64;
        let mut member_count = 0usize;

        for &i in &self.members {
            let Some(c) = candidates.get(i) else { continue };
            member_count += 1;
            probability_sum += c.probability;
            if c.probability >= high_confidence {
                high_confidence_count += 1;
            }
        }

        let mean_probability = if member_count == 0 {
            0.0
        } else {
            probability_sum / member_count as f64
        };

        ClusterMetrics {
            member_count,
            high_confidence_count,
            mean_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, probability: f64) -> Candidate {
        Candidate {
            id,
            location: Point::new(0.0, 0.0),
            probability,
        }
    }

    #[test]
    fn test_metrics() {
        let candidates = vec![
            candidate(1, 0.95),
            candidate(2, 0.85),
            candidate(3, 0.60),
        ];
        let cluster = Cluster {
            members: vec![0, 1, 2],
            center: Point::new(0.0, 0.0),
        };

        let m = cluster.metrics(&candidates, 0.9);
        assert_eq!(m.member_count, 3);
        assert_eq!(m.high_confidence_count, 1);
        assert!((m.mean_probability - 0.8).abs() < 1e-12);

        let m = cluster.metrics(&candidates, 0.8);
        assert_eq!(m.high_confidence_count, 2);
    }

    #[test]
    fn test_metrics_inclusive_sub_threshold() {
        let candidates = vec![candidate(1, 0.9)];
        let cluster = Cluster {
            members: vec![0],
            center: Point::new(0.0, 0.0),
        };
        assert_eq!(cluster.metrics(&candidates, 0.9).high_confidence_count, 1);
    }

    #[test]
    fn test_member_ids() {
        let candidates = vec![candidate(10, 0.9), candidate(20, 0.9)];
        let cluster = Cluster {
            members: vec![1, 0],
            center: Point::new(0.0, 0.0),
        };
        assert_eq!(cluster.member_ids(&candidates), vec![20, 10]);
    }
}
