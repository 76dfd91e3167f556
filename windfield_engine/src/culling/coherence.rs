//! FrameCoherenceCache: per-viewport memory of the previous frame.
//!
//! - Visibility diff between consecutive frames (entered / stayed / left,
//!   plus stayed-but-changed-tier)
//! - Reuse of the whole annotated set when nothing that affects it changed
//!
//! The diff costs O(visible now + visible before): records are stamped with
//! an internal epoch instead of being cleared each frame.
//!
//! Bound to one index generation. Seeing another generation (a rebuild) or
//! an explicit camera reset wipes the cache.

use glam::Mat4;
use rustc_hash::FxHashMap;
use crate::engine_debug;
use crate::spatial::ObjectId;
use super::culler::{CullStats, VisibleObject};

const SOURCE: &str = "windfield::FrameCoherenceCache";

/// Last known state of one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityRecord {
    /// Visible in the most recent update
    pub visible: bool,
    /// Tier at the last frame the object was visible
    pub tier: u8,
    /// Frame index of the last update that saw the object visible
    pub last_frame: u64,
    epoch: u64,
}

/// Difference between two consecutive updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoherenceDiff {
    pub still_visible: Vec<ObjectId>,
    pub newly_visible: Vec<ObjectId>,
    pub newly_hidden: Vec<ObjectId>,
    /// Subset of `still_visible` whose tier changed
    pub lod_changed: Vec<ObjectId>,
    /// The cache was invalidated before this update; consumers should drop
    /// any state they derived from earlier diffs.
    pub reset: bool,
}

impl CoherenceDiff {
    /// True if the visible set and every tier are unchanged.
    pub fn is_unchanged(&self) -> bool {
        !self.reset
            && self.newly_visible.is_empty()
            && self.newly_hidden.is_empty()
            && self.lod_changed.is_empty()
    }
}

/// Everything the annotated visible set depends on. View and projection
/// are kept apart: the frustum follows from their product, but distances
/// follow from the eye position in `view` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ReuseKey {
    pub(crate) generation: u64,
    pub(crate) view: Mat4,
    pub(crate) projection: Mat4,
    pub(crate) lod_revision: u64,
}

/// Previous-frame visibility of one camera.
#[derive(Debug, Default)]
pub struct FrameCoherenceCache {
    records: FxHashMap<ObjectId, VisibilityRecord>,
    /// Ids visible in the most recent update
    visible: Vec<ObjectId>,
    epoch: u64,
    last_frame: Option<u64>,
    generation: Option<u64>,
    pending_reset: bool,
    reuse_key: Option<ReuseKey>,
    reuse_objects: Vec<VisibleObject>,
    reuse_stats: Option<CullStats>,
}

impl FrameCoherenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `visible_now` (id, tier) against the previous update and record it.
    ///
    /// Ids appearing twice in `visible_now` count once (first tier wins).
    pub fn update<I>(&mut self, frame_index: u64, visible_now: I) -> CoherenceDiff
    where
        I: IntoIterator<Item = (ObjectId, u8)>,
    {
        self.epoch += 1;
        let epoch = self.epoch;
        let mut diff = CoherenceDiff {
            reset: std::mem::take(&mut self.pending_reset),
            ..CoherenceDiff::default()
        };

        let mut now = Vec::with_capacity(self.visible.len());
        for (id, tier) in visible_now {
            let record = self.records.entry(id).or_insert(VisibilityRecord {
                visible: false,
                tier,
                last_frame: frame_index,
                epoch: 0,
            });
            if record.epoch == epoch {
                continue;
            }

            if record.visible {
                diff.still_visible.push(id);
                if record.tier != tier {
                    diff.lod_changed.push(id);
                }
            } else {
                diff.newly_visible.push(id);
            }

            record.visible = true;
            record.tier = tier;
            record.last_frame = frame_index;
            record.epoch = epoch;
            now.push(id);
        }

        for id in std::mem::replace(&mut self.visible, now) {
            if let Some(record) = self.records.get_mut(&id) {
                if record.epoch != epoch {
                    record.visible = false;
                    diff.newly_hidden.push(id);
                }
            }
        }

        self.last_frame = Some(frame_index);

        engine_debug!(SOURCE,
            "frame {}: {} still visible, {} entered, {} left, {} changed tier",
            frame_index, diff.still_visible.len(), diff.newly_visible.len(),
            diff.newly_hidden.len(), diff.lod_changed.len());

        diff
    }

    /// Forget everything (camera reset). The next update reports every
    /// visible object as newly visible and sets [`CoherenceDiff::reset`].
    pub fn invalidate(&mut self) {
        self.records.clear();
        self.visible.clear();
        self.reuse_key = None;
        self.reuse_objects.clear();
        self.reuse_stats = None;
        self.pending_reset = true;
    }

    /// Attach the cache to an index generation; a different generation
    /// invalidates it. Returns true if it was invalidated.
    pub fn bind_generation(&mut self, generation: u64) -> bool {
        if self.generation == Some(generation) {
            return false;
        }
        let rebound = self.generation.is_some();
        self.generation = Some(generation);
        if rebound {
            engine_debug!(SOURCE, "index generation changed to {}, cache invalidated", generation);
            self.invalidate();
        }
        rebound
    }

    // ===== REUSE =====

    /// Annotated set and stats of the last evaluation, if `key` matches it.
    pub(crate) fn reusable(&self, key: &ReuseKey) -> Option<(&[VisibleObject], &CullStats)> {
        match (&self.reuse_key, &self.reuse_stats) {
            (Some(stored), Some(stats)) if stored == key => Some((&self.reuse_objects, stats)),
            _ => None,
        }
    }

    pub(crate) fn store_evaluation(&mut self, key: ReuseKey, objects: &[VisibleObject], stats: &CullStats) {
        self.reuse_key = Some(key);
        self.reuse_objects.clear();
        self.reuse_objects.extend_from_slice(objects);
        self.reuse_stats = Some(stats.clone());
    }

    // ===== ACCESSORS =====

    pub fn record(&self, id: ObjectId) -> Option<&VisibilityRecord> {
        self.records.get(&id)
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.records.get(&id).is_some_and(|r| r.visible)
    }

    /// Ids visible in the most recent update.
    pub fn visible(&self) -> &[ObjectId] {
        &self.visible
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    /// Index to pass to the next [`update`](Self::update).
    pub fn next_frame_index(&self) -> u64 {
        self.last_frame.map_or(0, |f| f + 1)
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}

#[cfg(test)]
#[path = "coherence_tests.rs"]
mod tests;
