//! Spatial grouping strategies behind the `SpatialGrouper` boundary
//!
//! Three concrete implementations are provided and selected via
//! configuration, never via type inspection:
//!
//! - [`GridBucketer`]: fixed-size lat/lng cell binning
//! - [`RadiusLinkage`]: greedy single-pass grouping by distance to a seed
//! - [`ExternalGroups`]: delegate re-scoring pre-formed visual clusters

use crate::cluster::Cluster;
use crate::{Candidate, geoutil};
use geo::Point;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Abstraction boundary for clustering policies
///
/// Implementations must be pure with respect to the candidate slice: same
/// slice and parameters, same clusters, same order.
pub trait SpatialGrouper {
    /// Group candidates into disjoint clusters
    ///
    /// Member indices refer into the given slice. Candidates that join no
    /// qualifying cluster are simply absent from the output.
    fn group(&self, candidates: &[Candidate]) -> Vec<Cluster>;
}

/// Fixed-size lat/lng cell binning (grid strategy)
///
/// Each candidate lands in the cell `(floor(lng / grid_size),
/// floor(lat / grid_size))`; cells below `min_members` are dropped. A
/// real-world cluster straddling a cell boundary is split across cells;
/// this is an accepted policy limitation of the strategy, not a bug.
#[derive(Clone, Debug)]
pub struct GridBucketer {
    /// Cell edge length in degrees
    pub grid_size_degrees: f64,
    /// Minimum members for a cell to produce a cluster
    pub min_members: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SpatialGrouper for GridBucketer {
    fn group(&self, candidates: &[Candidate]) -> Vec<Cluster> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grouper::grid");

        let mut buckets: HashMap<(i64, i64), SmallVec<[usize; 8]>> = HashMap::new();
        // Cell keys in discovery order, so output order is deterministic
        // regardless of hash iteration order.
        let mut discovery: Vec<(i64, i64)> = Vec::new();

        for (i, c) in candidates.iter().enumerate() {
            let key = (
                (c.location.x() / self.grid_size_degrees).floor() as i64,
                (c.location.y() / self.grid_size_degrees).floor() as i64,
            );
            let members = buckets.entry(key).or_default();
            if members.is_empty() {
                discovery.push(key);
            }
            members.push(i);
        }

        let mut clusters: Vec<Cluster> = discovery
            .into_iter()
            .filter_map(|key| {
                let members = buckets.remove(&key)?;
                if members.len() < self.min_members {
                    return None;
                }
                let points: Vec<Point<f64>> =
                    members.iter().map(|&i| candidates[i].location).collect();
                Some(Cluster {
                    center: geoutil::centroid(&points),
                    members: members.into_vec(),
                })
            })
            .collect();

        // Downstream ordering is by descending member count; the sort is
        // stable so equal-sized cells keep discovery order.
        clusters.sort_by(|a, b| b.len().cmp(&a.len()));

        tracing::debug!(
            cells = clusters.len(),
            candidates = candidates.len(),
            "Grid bucketing complete"
        );
        clusters
    }
}

/// Greedy single-pass grouping by distance to a seed point (radius-linkage)
///
/// Candidates are scanned in list order; each unused candidate seeds a
/// cluster and absorbs every remaining unused candidate within `radius_km`
/// of the seed (not of the evolving centroid). Groups smaller than
/// `min_points` are discarded and their members are not re-queued.
///
/// This is intentionally order-dependent: a point equidistant from two seeds
/// joins whichever seed is processed first. That is preserved source
/// behavior; replacing it with transitive (union-find) clustering would be a
/// semantic change, not a fix.
#[derive(Clone, Debug)]
pub struct RadiusLinkage {
    /// Linkage radius in kilometers, measured from the seed
    pub radius_km: f64,
    /// Minimum members for a group to become a cluster
    pub min_points: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SpatialGrouper for RadiusLinkage {
    fn group(&self, candidates: &[Candidate]) -> Vec<Cluster> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grouper::radius_linkage");

        let mut used = vec![false; candidates.len()];
        let mut clusters = Vec::new();

        for seed_index in 0..candidates.len() {
            if used[seed_index] {
                continue;
            }
            used[seed_index] = true;
            let seed = candidates[seed_index].location;
            let mut members = vec![seed_index];

            for j in (seed_index + 1)..candidates.len() {
                if used[j] {
                    continue;
                }
                if geoutil::haversine_km(seed, candidates[j].location) <= self.radius_km {
                    used[j] = true;
                    members.push(j);
                }
            }

            // Too-small groups are dropped outright; their members stay
            // consumed rather than being re-queued under a later seed.
            if members.len() < self.min_points {
                continue;
            }

            let points: Vec<Point<f64>> =
                members.iter().map(|&i| candidates[i].location).collect();
            clusters.push(Cluster {
                center: geoutil::centroid(&points),
                members,
            });
        }

        tracing::debug!(
            clusters = clusters.len(),
            candidates = candidates.len(),
            "Radius linkage complete"
        );
        clusters
    }
}

/// Delegate over pre-formed visual clusters (cluster-rescoring strategy)
///
/// An external marker-clustering layer already groups nearby candidates for
/// display; this grouper re-expresses those groups (lists of candidate IDs)
/// as clusters over the current candidate slice so they can be re-scored and
/// ranked like any other strategy's output.
#[derive(Clone, Debug, Default)]
pub struct ExternalGroups {
    /// Pre-formed groups as candidate ID lists, in display order
    pub groups: Vec<Vec<u64>>,
    /// Minimum resolved members for a group to survive
    pub min_members: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SpatialGrouper for ExternalGroups {
    fn group(&self, candidates: &[Candidate]) -> Vec<Cluster> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grouper::external");

        // First occurrence wins for duplicate IDs; duplicates are otherwise
        // independent points and never deduplicated here.
        let mut index_by_id: HashMap<u64, usize> = HashMap::with_capacity(candidates.len());
        for (i, c) in candidates.iter().enumerate() {
            index_by_id.entry(c.id).or_insert(i);
        }

        self.groups
            .iter()
            .filter_map(|ids| {
                let members: Vec<usize> = ids
                    .iter()
                    .filter_map(|id| index_by_id.get(id).copied())
                    .collect();
                if members.len() < self.min_members || members.is_empty() {
                    return None;
                }
                let points: Vec<Point<f64>> =
                    members.iter().map(|&i| candidates[i].location).collect();
                Some(Cluster {
                    center: geoutil::centroid(&points),
                    members,
                })
            })
            .collect()
    }
}
