//! Pluggable cluster scoring formulas
//!
//! The source history shows several mutually inconsistent scoring
//! experiments (raw count, ratio, density, log-weighted count); they are kept
//! side by side as a closed enum rather than collapsed into one "correct"
//! formula, so the ranking behavior can be swapped without touching the
//! clusterer.

use crate::cluster::ClusterMetrics;

/// High-confidence sub-threshold used by the ratio and log-weighted formulas
const HIGH_CONFIDENCE_STRICT: f64 = 0.9;
/// Looser sub-threshold used by the weighted-density formula
const HIGH_CONFIDENCE_LOOSE: f64 = 0.8;

/// Scoring formula applied to each cluster before ranking
///
/// Higher scores read as "more suspicious/interesting".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoringFormula {
    /// score = member count
    SizeOnly,
    /// score = (members >= 0.9) / total
    HighConfidenceRatio,
    /// score = mean probability x (members >= 0.8) / total
    WeightedDensity,
    /// score = (members >= 0.9) x ln(total + 1)
    #[default]
    LogWeightedCount,
}

impl ScoringFormula {
    /// The high-confidence sub-threshold this formula counts against
    #[inline]
    pub fn high_confidence_threshold(&self) -> f64 {
        match self {
            Self::WeightedDensity => HIGH_CONFIDENCE_LOOSE,
            _ => HIGH_CONFIDENCE_STRICT,
        }
    }

    /// Score a cluster from its metrics
    pub fn score(&self, metrics: &ClusterMetrics) -> f64 {
        if metrics.member_count == 0 {
            return 0.0;
        }
        let total = metrics.member_count as f64;
        let high = metrics.high_confidence_count as f64;

        match self {
            Self::SizeOnly => total,
            Self::HighConfidenceRatio => high / total,
            Self::WeightedDensity => metrics.mean_probability * (high / total),
            Self::LogWeightedCount => high * (total + 1.0).ln(),
        }
    }

    /// All formulas, for configuration surfaces
    pub fn all() -> &'static [Self] {
        &[
            Self::SizeOnly,
            Self::HighConfidenceRatio,
            Self::WeightedDensity,
            Self::LogWeightedCount,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SizeOnly => "size-only",
            Self::HighConfidenceRatio => "high-confidence-ratio",
            Self::WeightedDensity => "weighted-density",
            Self::LogWeightedCount => "log-weighted-count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(member_count: usize, high_confidence_count: usize, mean: f64) -> ClusterMetrics {
        ClusterMetrics {
            member_count,
            high_confidence_count,
            mean_probability: mean,
        }
    }

    #[test]
    fn test_size_only() {
        assert_eq!(ScoringFormula::SizeOnly.score(&metrics(7, 3, 0.8)), 7.0);
    }

    #[test]
    fn test_high_confidence_ratio() {
        let s = ScoringFormula::HighConfidenceRatio.score(&metrics(4, 3, 0.8));
        assert!((s - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_density() {
        let s = ScoringFormula::WeightedDensity.score(&metrics(4, 2, 0.9));
        assert!((s - 0.9 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_log_weighted_count() {
        let s = ScoringFormula::LogWeightedCount.score(&metrics(5, 3, 0.9));
        assert!((s - 3.0 * 6.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_cluster_scores_zero() {
        for formula in ScoringFormula::all() {
            assert_eq!(formula.score(&metrics(0, 0, 0.0)), 0.0);
        }
    }

    #[test]
    fn test_sub_thresholds() {
        assert_eq!(
            ScoringFormula::WeightedDensity.high_confidence_threshold(),
            0.8
        );
        assert_eq!(
            ScoringFormula::LogWeightedCount.high_confidence_threshold(),
            0.9
        );
        assert_eq!(ScoringFormula::SizeOnly.high_confidence_threshold(), 0.9);
    }
}
