//! ZoneEngine - Recompute controller owning the zone pipeline
//!
//! The engine owns an immutable candidate snapshot, the active
//! configuration, and the current zone output. UI-facing triggers (slider
//! drags, viewport settles, toggle clicks) are funneled through a single-slot
//! debouncer so only the last trigger in a burst recomputes; the pipeline
//! itself is a pure function of (snapshot, configuration).

use crate::candidate::{CandidateRecord, CandidateSet};
use crate::debounce::Debouncer;
use crate::grouper::{ExternalGroups, GridBucketer, RadiusLinkage, SpatialGrouper};
use crate::select::{SelectionPolicy, rank_zones};
use crate::zone::{PresentationConfig, Zone, ZoneDisplay};
use crate::{Result, ScoringFormula, ZoneError};
use std::time::Duration;

/// Which clustering policy feeds the scorer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneStrategy {
    /// Fixed-size lat/lng cell binning
    Grid,
    /// Greedy seed-distance grouping of high-confidence candidates
    #[default]
    RadiusLinkage,
    /// Re-score pre-formed visual clusters supplied by the display layer
    ClusterRescoring,
}

/// Full configuration surface of the engine
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneConfig {
    /// Minimum probability for a candidate to be visible/eligible (inclusive)
    pub probability_threshold: f64,
    /// Active clustering policy
    pub strategy: ZoneStrategy,
    /// Active scoring formula
    pub scoring: ScoringFormula,
    /// How many scored clusters survive as zones
    pub selection: SelectionPolicy,
    /// Linkage radius in kilometers (radius-linkage strategy)
    pub linkage_radius_km: f64,
    /// Cell edge length in degrees (grid strategy)
    pub grid_size_degrees: f64,
    /// Minimum size for a group to become a zone
    pub min_cluster_members: usize,
    /// Quiet period before a debounced recompute runs
    pub debounce: Duration,
    /// Candidates at/above this probability count as needing review when
    /// they lack a recorded vote
    pub review_threshold: f64,
    /// Display-record tuning
    pub presentation: PresentationConfig,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            probability_threshold: 0.5,
            strategy: ZoneStrategy::RadiusLinkage,
            scoring: ScoringFormula::LogWeightedCount,
            selection: SelectionPolicy::TopK(8),
            linkage_radius_km: 5.0,
            grid_size_degrees: 0.5,
            min_cluster_members: 2,
            debounce: Duration::from_millis(150),
            review_threshold: 0.7,
            presentation: PresentationConfig::default(),
        }
    }
}

impl ZoneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability_threshold)
            || !self.probability_threshold.is_finite()
        {
            return Err(ZoneError::ThresholdOutOfRange(self.probability_threshold));
        }
        if !(0.0..=1.0).contains(&self.review_threshold) || !self.review_threshold.is_finite() {
            return Err(ZoneError::ThresholdOutOfRange(self.review_threshold));
        }
        if !self.linkage_radius_km.is_finite() || self.linkage_radius_km <= 0.0 {
            return Err(ZoneError::InvalidSpatialParameter(format!(
                "linkage radius must be positive, got {}",
                self.linkage_radius_km
            )));
        }
        if !self.grid_size_degrees.is_finite() || self.grid_size_degrees <= 0.0 {
            return Err(ZoneError::InvalidSpatialParameter(format!(
                "grid size must be positive, got {}",
                self.grid_size_degrees
            )));
        }
        match self.selection {
            SelectionPolicy::TopK(0) => Err(ZoneError::InvalidSelectionPolicy(
                "topK count must be at least 1".to_string(),
            )),
            SelectionPolicy::TopFraction(p) if !(p > 0.0 && p <= 1.0) => Err(
                ZoneError::InvalidSelectionPolicy(format!("fraction must be in (0, 1], got {p}")),
            ),
            _ => Ok(()),
        }
    }
}

/// Recompute controller state machine
///
/// `Disabled -> (enable) -> Computing -> Ready`; filter/viewport changes
/// loop `Ready -> Computing -> Ready` through the debouncer; disabling from
/// any state clears the output immediately and cancels pending work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    Disabled,
    Computing,
    Ready,
}

/// Debounced zone-recompute controller
///
/// The UI layer owns a single instance and re-renders from [`zones`] /
/// [`displays`] after each recompute; engine internals are never read
/// directly.
///
/// [`zones`]: ZoneEngine::zones
/// [`displays`]: ZoneEngine::displays
pub struct ZoneEngine {
    config: ZoneConfig,
    candidates: CandidateSet,
    enabled: bool,
    status: EngineStatus,
    zones: Vec<Zone>,
    debouncer: Debouncer,
    /// Pre-formed visual groups for the cluster-rescoring strategy
    external_groups: Vec<Vec<u64>>,
    next_generation: u64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl ZoneEngine {
    /// Create a disabled engine with an empty snapshot
    pub fn new(config: ZoneConfig) -> Result<Self> {
        config.validate()?;
        let debouncer = Debouncer::new(config.debounce);
        Ok(Self {
            config,
            candidates: CandidateSet::default(),
            enabled: false,
            status: EngineStatus::Disabled,
            zones: Vec::new(),
            debouncer,
            external_groups: Vec::new(),
            next_generation: 1,
        })
    }

    /// Replace the candidate snapshot from raw records
    ///
    /// Malformed records are skipped with a warning. Bumps the generation
    /// stamp; recomputes immediately when zones are enabled.
    pub fn load_dataset(&mut self, records: &[CandidateRecord]) {
        #[cfg(feature = "profiling")]
        profiling::scope!("engine::load_dataset");

        let generation = self.next_generation;
        self.next_generation += 1;
        self.candidates = CandidateSet::from_records(records, generation);
        tracing::debug!(
            generation,
            loaded = self.candidates.len(),
            records = records.len(),
            "Candidate dataset loaded"
        );

        if self.enabled {
            self.recompute();
        }
    }

    /// Enable zone display and recompute immediately
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.recompute();
    }

    /// Disable zone display
    ///
    /// Clears the displayed zones immediately and cancels any pending
    /// debounced computation.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.zones.clear();
        self.debouncer.cancel();
        self.status = EngineStatus::Disabled;
    }

    /// Change the probability threshold (debounced)
    ///
    /// Slider drags arrive as a burst; only the last value within the quiet
    /// period triggers a recompute via [`poll`](ZoneEngine::poll).
    pub fn set_probability_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) || !threshold.is_finite() {
            return Err(ZoneError::ThresholdOutOfRange(threshold));
        }
        self.config.probability_threshold = threshold;
        if self.enabled {
            self.debouncer.trigger();
        }
        Ok(())
    }

    /// Notify the engine that the map viewport settled
    ///
    /// The grid and radius-linkage strategies recompute from the candidate
    /// snapshot; the cluster-rescoring strategy instead waits for fresh
    /// groups from the display layer's own clusterer, so it skips this
    /// trigger.
    pub fn viewport_changed(&mut self) {
        if self.enabled && self.config.strategy != ZoneStrategy::ClusterRescoring {
            self.debouncer.trigger();
        }
    }

    /// Install fresh pre-formed visual groups (cluster-rescoring strategy)
    pub fn external_groups_changed(&mut self, groups: Vec<Vec<u64>>) {
        self.external_groups = groups;
        if self.enabled && self.config.strategy == ZoneStrategy::ClusterRescoring {
            self.debouncer.trigger();
        }
    }

    /// Pump the debouncer; recompute if the quiet period elapsed
    ///
    /// Returns `true` when a recompute ran.
    pub fn poll(&mut self) -> bool {
        if self.enabled && self.debouncer.take_if_ready() {
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Force an immediate recompute, bypassing the debouncer
    pub fn recompute_now(&mut self) {
        if self.enabled {
            self.debouncer.cancel();
            self.recompute();
        }
    }

    /// The current ranked zones (empty while disabled)
    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Display records for the rendering collaborator
    pub fn displays(&self) -> Vec<ZoneDisplay> {
        self.zones
            .iter()
            .map(|z| z.display(&self.config.presentation))
            .collect()
    }

    /// Candidates above the review threshold lacking a recorded vote
    ///
    /// Vote state is owned by the external vote store; the caller supplies
    /// the lookup.
    pub fn needs_review_count(&self, has_vote: impl Fn(u64) -> bool) -> usize {
        self.candidates
            .candidates()
            .iter()
            .filter(|c| c.probability >= self.config.review_threshold && !has_vote(c.id))
            .count()
    }

    #[inline]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Generation stamp of the current snapshot
    #[inline]
    pub fn dataset_generation(&self) -> u64 {
        self.candidates.generation()
    }

    /// Run the full pipeline: filter -> group -> score -> select
    ///
    /// Replaces the zones list wholesale; an empty result is valid output.
    fn recompute(&mut self) {
        #[cfg(feature = "profiling")]
        profiling::scope!("engine::recompute");

        self.status = EngineStatus::Computing;

        let filtered = self
            .candidates
            .filter_by_probability(self.config.probability_threshold);

        let clusters = self.grouper().group(&filtered);
        self.zones = rank_zones(
            clusters,
            &filtered,
            self.config.scoring,
            self.config.selection,
        );

        self.status = EngineStatus::Ready;
        tracing::debug!(
            generation = self.candidates.generation(),
            eligible = filtered.len(),
            zones = self.zones.len(),
            "Zones recomputed"
        );
    }

    /// Build the configured grouping strategy
    fn grouper(&self) -> Box<dyn SpatialGrouper> {
        match self.config.strategy {
            ZoneStrategy::Grid => Box::new(GridBucketer {
                grid_size_degrees: self.config.grid_size_degrees,
                min_members: self.config.min_cluster_members,
            }),
            ZoneStrategy::RadiusLinkage => Box::new(RadiusLinkage {
                radius_km: self.config.linkage_radius_km,
                min_points: self.config.min_cluster_members,
            }),
            ZoneStrategy::ClusterRescoring => Box::new(ExternalGroups {
                groups: self.external_groups.clone(),
                min_members: self.config.min_cluster_members,
            }),
        }
    }
}
