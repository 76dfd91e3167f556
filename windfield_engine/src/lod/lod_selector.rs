//! LOD selection: maps a visible object's camera distance (or projected
//! size) to a tier of the active table.

use std::sync::atomic::{AtomicU64, Ordering};
use crate::config::{CullingConfig, DEFAULT_LOD_REFERENCE_DISTANCE};
use crate::error::Result;
use crate::{engine_bail, engine_info};
use super::lod_table::{LodMode, LodTable};

const SOURCE: &str = "windfield::LodSelector";

/// Pixel heights separating screen-size tiers 0..4 (largest first).
const SCREEN_SIZE_BANDS: [f32; 4] = [100.0, 50.0, 25.0, 10.0];

/// Distances below this count as "at the eye" for the screen-size metric.
const MIN_SCREEN_DISTANCE: f32 = 0.001;

/// Source of selector revision numbers.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// What the tier is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LodMetric {
    /// Camera distance looked up in the table's thresholds. Built-in tables
    /// are in normalized units, so the distance is first divided by the
    /// reference distance; custom tables take raw camera distances.
    #[default]
    Distance,
    /// Projected height in pixels of the bounding sphere's diameter, banded
    /// at 100 / 50 / 25 / 10 px. The table supplies the tier count and detail
    /// ratios; its thresholds are not used.
    ScreenSize {
        /// Viewport height in pixels
        screen_height: f32,
        /// Vertical field of view in radians
        fov_y: f32,
    },
}

/// Assigns LOD tiers. Pure: the same inputs always give the same tier.
///
/// The reference distance only scales the built-in tables. A custom table
/// installed with [`new`](Self::new) or [`set_table`](Self::set_table) is
/// matched against the camera distance as is.
///
/// Every change of table or metric bumps [`revision`](Self::revision) so
/// that frame caches holding tiers from the old setup are not reused.
#[derive(Debug, Clone)]
pub struct LodSelector {
    table: LodTable,
    mode: Option<LodMode>,
    metric: LodMetric,
    reference_distance: f32,
    revision: u64,
}

impl LodSelector {
    /// Divisor applied to camera distances before the table lookup.
    fn distance_scale(&self) -> f32 {
        match self.mode {
            Some(_) => self.reference_distance,
            None => 1.0,
        }
    }

    /// Selector over a custom table, whose thresholds are raw camera
    /// distances.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for unusable screen-size parameters.
    pub fn new(table: LodTable, metric: LodMetric) -> Result<Self> {
        validate_metric(metric, DEFAULT_LOD_REFERENCE_DISTANCE)?;
        Ok(Self {
            table,
            mode: None,
            metric,
            reference_distance: DEFAULT_LOD_REFERENCE_DISTANCE,
            revision: next_revision(),
        })
    }

    /// Selector over one of the built-in tables, scaled by
    /// `reference_distance`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a non-positive or non-finite reference
    /// distance or unusable screen-size parameters.
    pub fn with_mode(mode: LodMode, metric: LodMetric, reference_distance: f32) -> Result<Self> {
        validate_metric(metric, reference_distance)?;
        Ok(Self {
            table: LodTable::for_mode(mode),
            mode: Some(mode),
            metric,
            reference_distance,
            revision: next_revision(),
        })
    }

    /// Selector described by a configuration (custom table if one is set,
    /// otherwise the configured mode). The configured reference distance is
    /// kept for later mode switches either way.
    pub fn from_config(config: &CullingConfig) -> Result<Self> {
        let mut selector = Self::with_mode(config.lod_mode, config.lod_metric, config.lod_reference_distance)?;
        if let Some(table) = &config.lod_table {
            selector.table = table.clone();
            selector.mode = None;
        }
        Ok(selector)
    }

    /// Tier for an object of bounding radius `radius` at `distance` from
    /// the camera.
    pub fn select(&self, distance: f32, radius: f32) -> u8 {
        match self.metric {
            LodMetric::Distance => self.table.assign_tier(distance / self.distance_scale()),
            LodMetric::ScreenSize { .. } => {
                let size = self.screen_size(radius, distance);
                if size.is_nan() {
                    return self.table.last_tier();
                }
                let tier = SCREEN_SIZE_BANDS.iter().take_while(|&&band| size < band).count();
                (tier as u8).min(self.table.last_tier())
            }
        }
    }

    /// Projected height in pixels of a sphere of `radius` at `distance`
    /// (`INFINITY` when the eye is inside it, 0 for the distance metric).
    pub fn screen_size(&self, radius: f32, distance: f32) -> f32 {
        match self.metric {
            LodMetric::Distance => 0.0,
            LodMetric::ScreenSize { screen_height, fov_y } => {
                if distance < MIN_SCREEN_DISTANCE {
                    return f32::INFINITY;
                }
                (2.0 * radius) * screen_height / (2.0 * distance * (fov_y * 0.5).tan())
            }
        }
    }

    // ===== SWITCHES =====

    /// Switch to a built-in table.
    pub fn set_mode(&mut self, mode: LodMode) {
        if self.mode == Some(mode) {
            return;
        }
        self.table = LodTable::for_mode(mode);
        self.mode = Some(mode);
        self.revision = next_revision();
        engine_info!(SOURCE, "LOD mode switched to {} ({} tiers)", mode, self.table.len());
    }

    /// Switch to a custom table (thresholds in raw camera distance).
    pub fn set_table(&mut self, table: LodTable) {
        self.table = table;
        self.mode = None;
        self.revision = next_revision();
        engine_info!(SOURCE, "Custom LOD table installed ({} tiers)", self.table.len());
    }

    /// Change the metric (e.g. after a viewport resize).
    pub fn set_metric(&mut self, metric: LodMetric) -> Result<()> {
        validate_metric(metric, self.reference_distance)?;
        if metric != self.metric {
            self.metric = metric;
            self.revision = next_revision();
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn table(&self) -> &LodTable {
        &self.table
    }

    /// Active built-in mode (`None` for a custom table).
    pub fn mode(&self) -> Option<LodMode> {
        self.mode
    }

    pub fn metric(&self) -> LodMetric {
        self.metric
    }

    /// Scale of the built-in tables (unused while a custom table is active).
    pub fn reference_distance(&self) -> f32 {
        self.reference_distance
    }

    /// Process-unique number of the current table/metric setup.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

pub(crate) fn validate_metric(metric: LodMetric, reference_distance: f32) -> Result<()> {
    if !reference_distance.is_finite() || reference_distance <= 0.0 {
        engine_bail!(InvalidConfiguration, SOURCE,
            "LOD reference distance must be positive and finite, got {}", reference_distance);
    }
    if let LodMetric::ScreenSize { screen_height, fov_y } = metric {
        if !screen_height.is_finite() || screen_height <= 0.0 {
            engine_bail!(InvalidConfiguration, SOURCE,
                "screen height must be positive, got {}", screen_height);
        }
        if !fov_y.is_finite() || fov_y <= 0.0 || fov_y >= std::f32::consts::PI {
            engine_bail!(InvalidConfiguration, SOURCE,
                "vertical field of view must lie in (0, pi), got {}", fov_y);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "lod_selector_tests.rs"]
mod tests;
