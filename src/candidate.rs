//! Candidate storage and dataset loading
//!
//! This module provides the `Candidate` struct for validated, immutable
//! candidate sites and the `CandidateSet` snapshot the engine recomputes from.

use geo::Point;
use rayon::prelude::*;

/// Raw input-boundary record as delivered by the data-loading collaborator
///
/// Fields are optional so a record missing a value survives deserialization
/// and can be rejected (with a warning) instead of failing the whole load.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateRecord {
    pub id: u64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub probability: Option<f64>,
}

/// A single ML-flagged location with a confidence probability
///
/// Immutable once loaded; voting state lives in an external store and never
/// mutates a candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Opaque stable identifier, unique per dataset (duplicates tolerated and
    /// treated as independent points)
    pub id: u64,
    /// WGS84 location: x = longitude, y = latitude, in degrees
    pub location: Point<f64>,
    /// Detection confidence in [0, 1] from the external model
    pub probability: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Candidate {
    /// Validate a raw record into a candidate
    ///
    /// Returns `None` (after logging a warning) when a field is missing,
    /// non-finite, or out of range. One bad record must never abort zone
    /// computation for the rest of the dataset.
    pub fn from_record(record: &CandidateRecord) -> Option<Self> {
        let (Some(lat), Some(lng), Some(probability)) =
            (record.lat, record.lng, record.probability)
        else {
            tracing::warn!(id = record.id, "Skipping candidate with missing fields");
            return None;
        };

        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
            tracing::warn!(
                id = record.id,
                lat,
                lng,
                "Skipping candidate with invalid coordinates"
            );
            return None;
        }

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            tracing::warn!(
                id = record.id,
                probability,
                "Skipping candidate with invalid probability"
            );
            return None;
        }

        Some(Candidate {
            id: record.id,
            location: Point::new(lng, lat),
            probability,
        })
    }
}

/// Immutable snapshot of the loaded candidate dataset
///
/// Each snapshot carries a monotonically increasing generation stamp so a
/// future live backend can detect that a recompute ran against stale data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    generation: u64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl CandidateSet {
    /// Build a snapshot from raw records, skipping malformed ones
    ///
    /// Validation runs in parallel; input order is preserved for the
    /// surviving candidates.
    pub fn from_records(records: &[CandidateRecord], generation: u64) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("candidate_set::from_records");

        let candidates: Vec<Candidate> = records
            .par_iter()
            .map(Candidate::from_record)
            .collect::<Vec<Option<Candidate>>>()
            .into_iter()
            .flatten()
            .collect();

        Self {
            candidates,
            generation,
        }
    }

    /// Build a snapshot directly from validated candidates
    pub fn from_candidates(candidates: Vec<Candidate>, generation: u64) -> Self {
        Self {
            candidates,
            generation,
        }
    }

    /// Candidates with `probability >= min_p` in original order
    ///
    /// Pure and stable: the comparison is inclusive, and raising the
    /// threshold always yields a subset of the lower-threshold result.
    pub fn filter_by_probability(&self, min_p: f64) -> Vec<Candidate> {
        #[cfg(feature = "profiling")]
        profiling::scope!("candidate_set::filter");

        self.candidates
            .iter()
            .filter(|c| c.probability >= min_p)
            .copied()
            .collect()
    }

    /// All candidates in load order
    #[inline]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Generation stamp of this snapshot
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, lat: f64, lng: f64, probability: f64) -> CandidateRecord {
        CandidateRecord {
            id,
            lat: Some(lat),
            lng: Some(lng),
            probability: Some(probability),
        }
    }

    #[test]
    fn test_from_record_valid() {
        let c = Candidate::from_record(&record(1, 10.0, 20.0, 0.9)).unwrap();
        assert_eq!(c.id, 1);
        assert_eq!(c.location.y(), 10.0);
        assert_eq!(c.location.x(), 20.0);
        assert_eq!(c.probability, 0.9);
    }

    #[test]
    fn test_from_record_missing_fields() {
        let mut r = record(1, 10.0, 20.0, 0.9);
        r.lat = None;
        assert!(Candidate::from_record(&r).is_none());

        let mut r = record(2, 10.0, 20.0, 0.9);
        r.probability = None;
        assert!(Candidate::from_record(&r).is_none());
    }

    #[test]
    fn test_from_record_out_of_range() {
        assert!(Candidate::from_record(&record(1, 91.0, 0.0, 0.5)).is_none());
        assert!(Candidate::from_record(&record(2, 0.0, 181.0, 0.5)).is_none());
        assert!(Candidate::from_record(&record(3, 0.0, 0.0, 1.5)).is_none());
        assert!(Candidate::from_record(&record(4, 0.0, 0.0, -0.1)).is_none());
        assert!(Candidate::from_record(&record(5, f64::NAN, 0.0, 0.5)).is_none());
        assert!(Candidate::from_record(&record(6, 0.0, 0.0, f64::NAN)).is_none());
    }

    #[test]
    fn test_from_records_skips_bad_preserves_order() {
        let records = vec![
            record(1, 10.0, 10.0, 0.9),
            record(2, f64::NAN, 10.0, 0.9),
            record(3, 11.0, 11.0, 0.8),
        ];
        let set = CandidateSet::from_records(&records, 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.candidates()[0].id, 1);
        assert_eq!(set.candidates()[1].id, 3);
        assert_eq!(set.generation(), 1);
    }

    #[test]
    fn test_filter_inclusive_boundary() {
        let records = vec![record(1, 0.0, 0.0, 0.7), record(2, 0.0, 0.0, 0.69)];
        let set = CandidateSet::from_records(&records, 0);
        let filtered = set.filter_by_probability(0.7);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_filter_monotone_subset() {
        let records: Vec<CandidateRecord> = (0..20)
            .map(|i| record(i, 0.0, 0.0, i as f64 / 20.0))
            .collect();
        let set = CandidateSet::from_records(&records, 0);

        let low = set.filter_by_probability(0.3);
        let high = set.filter_by_probability(0.6);
        assert!(high.len() <= low.len());
        for c in &high {
            assert!(low.iter().any(|l| l.id == c.id));
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![
            record(5, 0.0, 0.0, 0.9),
            record(3, 0.0, 0.0, 0.4),
            record(9, 0.0, 0.0, 0.95),
            record(1, 0.0, 0.0, 0.91),
        ];
        let set = CandidateSet::from_records(&records, 0);
        let filtered = set.filter_by_probability(0.9);
        let ids: Vec<u64> = filtered.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 9, 1]);
    }

    #[test]
    fn test_duplicate_ids_not_deduplicated() {
        let records = vec![record(7, 0.0, 0.0, 0.9), record(7, 1.0, 1.0, 0.8)];
        let set = CandidateSet::from_records(&records, 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let set = CandidateSet::from_records(&[], 0);
        assert!(set.is_empty());
        assert!(set.filter_by_probability(0.0).is_empty());
    }
}
