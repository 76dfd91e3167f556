//! Viewports: independent cameras culled against the same index.
//!
//! Each viewport owns its own frame coherence cache, so split screens or
//! a main view plus a minimap never disturb each other's diffs.
//! Stored in a SlotMap for O(1) insert/remove with stable keys.

use slotmap::{new_key_type, SlotMap};
use crate::camera::CameraState;
use crate::engine_debug;
use crate::spatial::SpatialIndex;
use super::coherence::FrameCoherenceCache;
use super::culler::{CullStats, VisibilityCuller, VisibleFrame};

const SOURCE: &str = "windfield::ViewportSet";

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a Viewport within a ViewportSet.
    ///
    /// A key becomes invalid only when its own viewport is removed.
    pub struct ViewportKey;
}

/// One camera's culling state.
#[derive(Debug, Default)]
pub struct Viewport {
    name: String,
    cache: FrameCoherenceCache,
    last_stats: Option<CullStats>,
}

impl Viewport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache: FrameCoherenceCache::new(),
            last_stats: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cache(&self) -> &FrameCoherenceCache {
        &self.cache
    }

    /// Stats of the most recent query through this viewport
    pub fn last_stats(&self) -> Option<&CullStats> {
        self.last_stats.as_ref()
    }

    /// Forget the previous frame (camera cut / teleport).
    pub fn reset(&mut self) {
        self.cache.invalidate();
        self.last_stats = None;
    }

    /// Cull `index` from `camera` and remember the result.
    pub fn query<P>(
        &mut self,
        culler: &mut VisibilityCuller,
        index: &SpatialIndex<'_, P>,
        camera: &CameraState,
    ) -> VisibleFrame {
        let frame = culler.query_visible(index, camera, &mut self.cache);
        self.last_stats = Some(frame.stats.clone());
        frame
    }
}

/// Collection of viewports sharing one culler and one index.
#[derive(Debug)]
pub struct ViewportSet {
    viewports: SlotMap<ViewportKey, Viewport>,
}

impl Default for ViewportSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportSet {
    pub fn new() -> Self {
        Self {
            viewports: SlotMap::with_key(),
        }
    }

    /// Add a viewport and return its key.
    ///
    /// Names are labels only; duplicates are allowed and [`find`](Self::find)
    /// returns any one of them.
    pub fn add(&mut self, name: impl Into<String>) -> ViewportKey {
        let viewport = Viewport::new(name);
        engine_debug!(SOURCE, "Viewport '{}' added", viewport.name);
        self.viewports.insert(viewport)
    }

    /// Remove a viewport. Returns None if the key is invalid.
    pub fn remove(&mut self, key: ViewportKey) -> Option<Viewport> {
        let removed = self.viewports.remove(key);
        if let Some(viewport) = &removed {
            engine_debug!(SOURCE, "Viewport '{}' removed", viewport.name);
        }
        removed
    }

    pub fn get(&self, key: ViewportKey) -> Option<&Viewport> {
        self.viewports.get(key)
    }

    pub fn get_mut(&mut self, key: ViewportKey) -> Option<&mut Viewport> {
        self.viewports.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewportKey, &Viewport)> {
        self.viewports.iter()
    }

    /// Key of a viewport with this name
    pub fn find(&self, name: &str) -> Option<ViewportKey> {
        self.viewports
            .iter()
            .find(|(_, viewport)| viewport.name == name)
            .map(|(key, _)| key)
    }

    /// Reset one viewport. Returns false if the key is invalid.
    pub fn reset(&mut self, key: ViewportKey) -> bool {
        match self.viewports.get_mut(key) {
            Some(viewport) => {
                viewport.reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        for viewport in self.viewports.values_mut() {
            viewport.reset();
        }
    }

    /// Cull through one viewport. Returns None if the key is invalid.
    pub fn query<P>(
        &mut self,
        key: ViewportKey,
        culler: &mut VisibilityCuller,
        index: &SpatialIndex<'_, P>,
        camera: &CameraState,
    ) -> Option<VisibleFrame> {
        self.viewports
            .get_mut(key)
            .map(|viewport| viewport.query(culler, index, camera))
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
