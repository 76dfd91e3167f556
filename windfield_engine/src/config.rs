//! Culling configuration
//!
//! Resolved once (from defaults, builder calls or a hardware rendering tier)
//! and handed to the index build and the culler. Nothing reads hardware
//! state per frame.

use crate::error::Result;
use crate::engine_bail;
use crate::lod::{LodMetric, LodMode, LodTable};
use crate::lod::lod_selector::validate_metric;
use crate::spatial::{PartitionKind, PlacementPolicy};

const SOURCE: &str = "windfield::CullingConfig";

pub const DEFAULT_MAX_OBJECTS_PER_LEAF: usize = 8;
pub const DEFAULT_MAX_DEPTH: u32 = 10;
/// Deepest tree a configuration may ask for.
pub const MAX_DEPTH_LIMIT: u32 = 32;
/// Camera distance mapped to 1.0 before the built-in tables are consulted.
pub const DEFAULT_LOD_REFERENCE_DISTANCE: f32 = 2.0;

/// Hardware capability class of the host machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderingTier {
    /// Discrete high-end GPU
    High,
    /// Mid-range discrete GPU
    Medium,
    /// Older or integrated GPU
    Low,
    /// Software rendering
    Minimal,
}

impl RenderingTier {
    /// LOD tables suited to the tier.
    pub fn lod_mode(self) -> LodMode {
        match self {
            RenderingTier::High => LodMode::Standard,
            RenderingTier::Medium | RenderingTier::Low => LodMode::Aggressive,
            RenderingTier::Minimal => LodMode::Extreme,
        }
    }
}

/// Configuration of the spatial index and the visibility culler.
#[derive(Debug, Clone, PartialEq)]
pub struct CullingConfig {
    /// A node holding at most this many objects is not split (>= 1)
    pub max_objects_per_leaf: usize,
    /// Hard depth cap (root = 0, at most [`MAX_DEPTH_LIMIT`])
    pub max_depth: u32,
    pub partition: PartitionKind,
    pub placement: PlacementPolicy,
    /// Built-in LOD tables (ignored when `lod_table` is set)
    pub lod_mode: LodMode,
    /// Custom LOD table overriding `lod_mode`
    pub lod_table: Option<LodTable>,
    pub lod_metric: LodMetric,
    /// Camera distance that maps to 1.0 in the built-in tables (distance
    /// metric). A custom `lod_table` is matched against raw distances.
    pub lod_reference_distance: f32,
    /// Added to every bounding-sphere radius when culling (>= 0)
    pub frustum_padding: f32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            max_objects_per_leaf: DEFAULT_MAX_OBJECTS_PER_LEAF,
            max_depth: DEFAULT_MAX_DEPTH,
            partition: PartitionKind::Quadtree,
            placement: PlacementPolicy::Centroid,
            lod_mode: LodMode::Standard,
            lod_table: None,
            lod_metric: LodMetric::Distance,
            lod_reference_distance: DEFAULT_LOD_REFERENCE_DISTANCE,
            frustum_padding: 0.0,
        }
    }
}

impl CullingConfig {
    /// Preset for a hardware rendering tier.
    pub fn for_tier(tier: RenderingTier) -> Self {
        Self::default().with_lod_mode(tier.lod_mode())
    }

    /// Preset for an object population (picks the LOD mode by count).
    pub fn for_population(count: usize) -> Self {
        Self::default().with_lod_mode(LodMode::for_population(count))
    }

    // ===== BUILDERS =====

    pub fn with_max_objects_per_leaf(mut self, count: usize) -> Self {
        self.max_objects_per_leaf = count;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_partition(mut self, partition: PartitionKind) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    /// Select built-in tables; clears any custom table.
    pub fn with_lod_mode(mut self, mode: LodMode) -> Self {
        self.lod_mode = mode;
        self.lod_table = None;
        self
    }

    /// Install a custom table; its thresholds are raw camera distances.
    pub fn with_lod_table(mut self, table: LodTable) -> Self {
        self.lod_table = Some(table);
        self
    }

    pub fn with_lod_metric(mut self, metric: LodMetric) -> Self {
        self.lod_metric = metric;
        self
    }

    pub fn with_lod_reference_distance(mut self, distance: f32) -> Self {
        self.lod_reference_distance = distance;
        self
    }

    pub fn with_frustum_padding(mut self, padding: f32) -> Self {
        self.frustum_padding = padding;
        self
    }

    // ===== VALIDATION =====

    /// Reject unusable values.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero leaf size, a depth above
    /// [`MAX_DEPTH_LIMIT`], a negative or non-finite padding, or unusable
    /// LOD metric parameters.
    pub fn validate(&self) -> Result<()> {
        if self.max_objects_per_leaf == 0 {
            engine_bail!(InvalidConfiguration, SOURCE, "max_objects_per_leaf must be at least 1");
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            engine_bail!(InvalidConfiguration, SOURCE,
                "max_depth {} exceeds the limit of {}", self.max_depth, MAX_DEPTH_LIMIT);
        }
        if !self.frustum_padding.is_finite() || self.frustum_padding < 0.0 {
            engine_bail!(InvalidConfiguration, SOURCE,
                "frustum_padding must be finite and non-negative, got {}", self.frustum_padding);
        }
        validate_metric(self.lod_metric, self.lod_reference_distance)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
