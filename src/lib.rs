//! Farm Zone Library - Zone Detection and Ranking for Candidate Sites
//!
//! This library takes a set of geolocated candidate sites (each with a detection
//! probability from an external ML model) and produces a small ranked set of
//! "zones": geographic regions of elevated candidate density, ready to hand to a
//! map-rendering layer as overlays.
//!
//! # Architecture
//!
//! - **[`Candidate`]** / **[`CandidateSet`]**: Immutable snapshot of the loaded dataset
//! - **[`SpatialGrouper`]**: Pluggable clustering boundary with grid, radius-linkage,
//!   and external-delegate implementations
//! - **[`ScoringFormula`]** / **[`SelectionPolicy`]**: Pluggable ranking policies
//! - **[`Zone`]**: Ranked, scored, presentation-ready output
//! - **[`ZoneEngine`]**: Debounced recompute controller owning the pipeline
//!
//! # Performance Characteristics
//!
//! - **Filter**: O(N) over the snapshot, parallel validation at load time
//! - **Grouping**: O(N) for the grid strategy, O(M²) for radius linkage where
//!   M is the high-confidence subset (expected small)
//! - **Ranking**: O(C log C) over clusters

mod candidate;
mod cluster;
mod debounce;
mod engine;
pub mod geoutil;
mod grouper;
mod score;
mod select;
mod zone;

// Public API exports
pub use candidate::{Candidate, CandidateRecord, CandidateSet};
pub use cluster::{Cluster, ClusterMetrics};
pub use debounce::Debouncer;
pub use engine::{EngineStatus, ZoneConfig, ZoneEngine, ZoneStrategy};
pub use grouper::{ExternalGroups, GridBucketer, RadiusLinkage, SpatialGrouper};
pub use score::ScoringFormula;
pub use select::SelectionPolicy;
pub use zone::{ColorTier, PresentationConfig, Zone, ZoneDisplay, ZoneSummary};

/// Error types for configuration validation
///
/// The recompute pipeline itself is infallible: malformed candidate records are
/// skipped with a warning and empty results are valid output, so only invalid
/// configuration ever surfaces as an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("probability threshold out of range [0, 1]: {0}")]
    ThresholdOutOfRange(f64),

    #[error("invalid spatial parameter: {0}")]
    InvalidSpatialParameter(String),

    #[error("invalid selection policy: {0}")]
    InvalidSelectionPolicy(String),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
