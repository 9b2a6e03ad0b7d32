//! Zone output records and the presentation boundary
//!
//! A `Zone` is a ranked, scored cluster; `ZoneDisplay` is the record handed
//! to the rendering collaborator (center, suggested radius, color tier).

use geo::Point;

/// Derived display fields summarizing a zone's members
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSummary {
    /// Total member count
    pub member_count: usize,
    /// Members at/above the active formula's high-confidence sub-threshold
    pub high_confidence_count: usize,
    /// Mean probability across members
    pub mean_probability: f64,
}

/// A ranked, scored, presentation-ready cluster
///
/// The zones list is fully replaced on every recompute, never merged.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    /// 1-based position after sorting by score descending
    pub rank: usize,
    /// Score from the active formula; higher is more interesting
    pub score: f64,
    /// Arithmetic-mean centroid (x = longitude, y = latitude)
    pub center: Point<f64>,
    /// Candidate IDs of the members, in cluster order
    pub member_ids: Vec<u64>,
    /// Display summary
    pub summary: ZoneSummary,
}

/// Tuning for the display-record mapping
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationConfig {
    /// Base overlay radius in meters
    pub base_radius_m: f64,
    /// Additional radius per member in meters
    pub per_member_radius_m: f64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            base_radius_m: 300.0,
            per_member_radius_m: 150.0,
        }
    }
}

/// Rank-derived color tier for overlay styling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorTier {
    /// Rank 1
    Critical,
    /// Ranks 2-3
    High,
    /// Everything below
    Elevated,
}

impl ColorTier {
    /// Tier for a 1-based rank
    #[inline]
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Critical,
            2 | 3 => Self::High,
            _ => Self::Elevated,
        }
    }

    /// Suggested overlay color as an RGB hex string
    pub fn hex_color(&self) -> &'static str {
        match self {
            Self::Critical => "#d32f2f",
            Self::High => "#f57c00",
            Self::Elevated => "#fbc02d",
        }
    }
}

/// Display record consumed by the rendering collaborator
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneDisplay {
    pub rank: usize,
    /// Latitude in degrees
    pub center_lat: f64,
    /// Longitude in degrees
    pub center_lng: f64,
    /// Suggested overlay radius in meters
    pub radius_m: f64,
    pub tier: ColorTier,
    pub member_count: usize,
    pub high_confidence_count: usize,
    pub mean_probability: f64,
}

impl Zone {
    /// Map this zone to its display record
    pub fn display(&self, presentation: &PresentationConfig) -> ZoneDisplay {
        ZoneDisplay {
            rank: self.rank,
            center_lat: self.center.y(),
            center_lng: self.center.x(),
            radius_m: presentation.base_radius_m
                + self.summary.member_count as f64 * presentation.per_member_radius_m,
            tier: ColorTier::for_rank(self.rank),
            member_count: self.summary.member_count,
            high_confidence_count: self.summary.high_confidence_count,
            mean_probability: self.summary.mean_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(rank: usize, members: usize) -> Zone {
        Zone {
            rank,
            score: 1.0,
            center: Point::new(10.5, 48.2),
            member_ids: (0..members as u64).collect(),
            summary: ZoneSummary {
                member_count: members,
                high_confidence_count: members / 2,
                mean_probability: 0.85,
            },
        }
    }

    #[test]
    fn test_display_radius_grows_with_members() {
        let presentation = PresentationConfig::default();
        let small = zone(1, 2).display(&presentation);
        let large = zone(1, 10).display(&presentation);
        assert_eq!(small.radius_m, 300.0 + 2.0 * 150.0);
        assert_eq!(large.radius_m, 300.0 + 10.0 * 150.0);
        assert!(large.radius_m > small.radius_m);
    }

    #[test]
    fn test_display_center_lat_lng() {
        let d = zone(1, 3).display(&PresentationConfig::default());
        assert_eq!(d.center_lat, 48.2);
        assert_eq!(d.center_lng, 10.5);
    }

    #[test]
    fn test_color_tiers() {
        assert_eq!(ColorTier::for_rank(1), ColorTier::Critical);
        assert_eq!(ColorTier::for_rank(2), ColorTier::High);
        assert_eq!(ColorTier::for_rank(3), ColorTier::High);
        assert_eq!(ColorTier::for_rank(4), ColorTier::Elevated);
        assert_eq!(ColorTier::for_rank(8), ColorTier::Elevated);
    }

    #[test]
    fn test_tier_colors_distinct() {
        let colors = [
            ColorTier::Critical.hex_color(),
            ColorTier::High.hex_color(),
            ColorTier::Elevated.hex_color(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
