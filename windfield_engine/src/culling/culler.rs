//! VisibilityCuller: per-frame visible set with LOD tiers.
//!
//! Per frame:
//! 1. camera → frustum and eye position
//! 2. hierarchical index query against the frustum (sphere test uses
//!    `radius + padding`)
//! 3. camera distance and LOD tier for every candidate
//! 4. coherence diff against the viewport's previous frame
//!
//! Steps 1-3 are skipped when the cache shows that neither the index, the
//! view and projection matrices nor the LOD setup changed since its last
//! frame.

use std::time::{Duration, Instant};
use glam::Vec3;
use crate::camera::{CameraState, Frustum};
use crate::config::CullingConfig;
use crate::error::Result;
use crate::lod::{LodMode, LodSelector};
use crate::spatial::{ObjectId, QueryStats, SpatialIndex};
use crate::{engine_debug, engine_info, engine_warn};
use super::coherence::{CoherenceDiff, FrameCoherenceCache, ReuseKey};

const SOURCE: &str = "windfield::VisibilityCuller";

/// A query hit before LOD assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the index's object slice
    pub index: u32,
    /// Euclidean distance from the eye to the object position
    pub distance: f32,
}

/// One entry of the annotated visible set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleObject {
    pub id: ObjectId,
    /// Index into the index's object slice
    pub index: u32,
    pub distance: f32,
    pub tier: u8,
}

/// Counters of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullStats {
    /// Objects in the index
    pub total_objects: usize,
    pub visible_objects: usize,
    pub nodes_visited: usize,
    pub nodes_culled: usize,
    pub nodes_accepted: usize,
    pub objects_tested: usize,
    /// Visible objects per LOD tier
    pub tier_histogram: Vec<usize>,
    pub elapsed: Duration,
    /// The previous frame's set was reused without traversal
    pub reused: bool,
    /// The frustum was degenerate and nothing was reported visible
    pub degenerate_frustum: bool,
}

impl CullStats {
    /// Fraction of the index not handed to the renderer (0 for an empty index).
    pub fn culled_fraction(&self) -> f32 {
        if self.total_objects == 0 {
            return 0.0;
        }
        1.0 - self.visible_objects as f32 / self.total_objects as f32
    }
}

/// Result of [`VisibilityCuller::query_visible`].
#[derive(Debug, Clone)]
pub struct VisibleFrame {
    pub frame_index: u64,
    /// Visible objects in no particular order (see `draw_order` for sorting)
    pub objects: Vec<VisibleObject>,
    pub diff: CoherenceDiff,
    pub stats: CullStats,
}

/// Frustum culler with LOD assignment.
///
/// Holds only the LOD selector and scratch buffers; per-camera state lives
/// in the [`FrameCoherenceCache`] passed to each query, so one culler can
/// serve several viewports.
pub struct VisibilityCuller {
    selector: LodSelector,
    hits: Vec<u32>,
    candidates: Vec<Candidate>,
}

impl VisibilityCuller {
    /// Culler with the LOD setup described by `config`.
    pub fn new(config: &CullingConfig) -> Result<Self> {
        config.validate()?;
        let selector = LodSelector::from_config(config)?;
        engine_info!(SOURCE, "Culler ready: {} LOD tiers, metric {:?}",
            selector.table().len(), selector.metric());
        Ok(Self::with_selector(selector))
    }

    pub fn with_selector(selector: LodSelector) -> Self {
        Self {
            selector,
            hits: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Candidates whose padded bounding sphere may intersect `frustum`,
    /// with their distance to `eye`. `out` is cleared first.
    ///
    /// A degenerate frustum yields no candidates (and a warning).
    pub fn get_visible<P>(
        &mut self,
        index: &SpatialIndex<'_, P>,
        frustum: &Frustum,
        eye: Vec3,
        out: &mut Vec<Candidate>,
    ) -> QueryStats {
        out.clear();
        if frustum.is_degenerate() {
            engine_warn!(SOURCE, "Degenerate frustum, reporting nothing visible");
            return QueryStats::default();
        }

        let stats = index.query(frustum, &mut self.hits);
        let objects = index.objects();
        out.extend(self.hits.iter().map(|&i| Candidate {
            index: i,
            distance: objects[i as usize].position.distance(eye),
        }));
        stats
    }

    /// Visible set of `camera` with LOD tiers and the coherence diff
    /// against the previous frame recorded in `cache`.
    ///
    /// Never fails: an empty index or a degenerate camera gives an empty set.
    pub fn query_visible<P>(
        &mut self,
        index: &SpatialIndex<'_, P>,
        camera: &CameraState,
        cache: &mut FrameCoherenceCache,
    ) -> VisibleFrame {
        let started = Instant::now();
        cache.bind_generation(index.generation());
        let frame_index = cache.next_frame_index();

        let key = ReuseKey {
            generation: index.generation(),
            view: *camera.view(),
            projection: *camera.projection(),
            lod_revision: self.selector.revision(),
        };

        if let Some((objects, stats)) = cache.reusable(&key) {
            let objects = objects.to_vec();
            let mut stats = stats.clone();
            stats.reused = true;
            stats.elapsed = started.elapsed();
            let diff = cache.update(frame_index, objects.iter().map(|o| (o.id, o.tier)));
            engine_debug!(SOURCE, "frame {}: camera unchanged, reused {} visible",
                frame_index, objects.len());
            return VisibleFrame { frame_index, objects, diff, stats };
        }

        let frustum = camera.frustum();
        let mut candidates = std::mem::take(&mut self.candidates);
        let query = self.get_visible(index, &frustum, camera.position(), &mut candidates);

        let table = self.selector.table();
        let mut tier_histogram = vec![0usize; table.len()];
        let source = index.objects();
        let objects: Vec<VisibleObject> = candidates
            .iter()
            .map(|c| {
                let object = &source[c.index as usize];
                let tier = self.selector.select(c.distance, object.radius);
                tier_histogram[tier as usize] += 1;
                VisibleObject { id: object.id, index: c.index, distance: c.distance, tier }
            })
            .collect();
        self.candidates = candidates;

        let stats = CullStats {
            total_objects: index.len(),
            visible_objects: objects.len(),
            nodes_visited: query.nodes_visited,
            nodes_culled: query.nodes_culled,
            nodes_accepted: query.nodes_accepted,
            objects_tested: query.objects_tested,
            tier_histogram,
            elapsed: started.elapsed(),
            reused: false,
            degenerate_frustum: frustum.is_degenerate(),
        };

        let diff = cache.update(frame_index, objects.iter().map(|o| (o.id, o.tier)));
        cache.store_evaluation(key, &objects, &stats);

        engine_debug!(SOURCE,
            "frame {}: {}/{} visible ({:.1}% culled), {} nodes visited, tiers {:?}, {:.2?}",
            frame_index, stats.visible_objects, stats.total_objects,
            stats.culled_fraction() * 100.0, stats.nodes_visited,
            stats.tier_histogram, stats.elapsed);

        VisibleFrame { frame_index, objects, diff, stats }
    }

    // ===== LOD =====

    pub fn selector(&self) -> &LodSelector {
        &self.selector
    }

    /// Mutable access for table/metric switches. Any change bumps the
    /// selector revision, so caches re-evaluate on their next frame.
    pub fn selector_mut(&mut self) -> &mut LodSelector {
        &mut self.selector
    }

    pub fn set_lod_mode(&mut self, mode: LodMode) {
        self.selector.set_mode(mode);
    }

    /// Estimated polygon savings of a frame under the current table.
    pub fn detail_savings(&self, stats: &CullStats) -> f32 {
        self.selector.table().estimated_savings(&stats.tier_histogram)
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
