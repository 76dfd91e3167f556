//! Draw ordering and per-tier instance batches.
//!
//! The visible set comes out of the culler unordered. Opaque turbines draw
//! best front-to-back (early depth rejection); blended billboards need
//! back-to-front. Batches group the set by LOD tier so each tier's mesh is
//! drawn with one instanced call.

use bytemuck::{Pod, Zeroable};
use rdst::{RadixKey, RadixSort};
use crate::lod::LodTable;
use crate::spatial::SpatialIndex;
use super::culler::VisibleObject;

/// Sort direction by camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    #[default]
    FrontToBack,
    BackToFront,
}

// Distances are non-negative, so their IEEE bit patterns sort like the
// values themselves. NaN (singular camera) sorts last.
impl RadixKey for VisibleObject {
    const LEVELS: usize = 4;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.distance.to_bits() >> (level * 8)) as u8
    }
}

/// Sort `objects` by distance in place (radix sort, not stable).
pub fn sort_by_distance(objects: &mut [VisibleObject], order: DrawOrder) {
    objects.radix_sort_unstable();
    if order == DrawOrder::BackToFront {
        objects.reverse();
    }
}

/// Per-instance data uploaded for instanced drawing.
///
/// 32 bytes, tightly packed, matching a std430 struct of
/// `vec3 position; float radius; float distance; float detail; uint tier; uint index;`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    pub position: [f32; 3],
    pub radius: f32,
    pub distance: f32,
    pub detail_ratio: f32,
    pub tier: u32,
    /// Index into the index's object slice
    pub index: u32,
}

/// Visible set split by LOD tier.
#[derive(Debug, Clone, Default)]
pub struct TierBatches {
    batches: Vec<Vec<InstanceRecord>>,
}

impl TierBatches {
    /// Group `objects` by tier. Order within a tier follows `objects`, so
    /// sort first for ordered batches.
    ///
    /// Tiers beyond the table (from a stale frame) land in its last tier.
    pub fn build<P>(index: &SpatialIndex<'_, P>, objects: &[VisibleObject], table: &LodTable) -> Self {
        let source = index.objects();
        let mut batches = vec![Vec::new(); table.len()];
        let last = table.last_tier();

        for visible in objects {
            let Some(object) = source.get(visible.index as usize) else {
                continue; // set from another index
            };
            let tier = visible.tier.min(last);
            batches[tier as usize].push(InstanceRecord {
                position: object.position.to_array(),
                radius: object.radius,
                distance: visible.distance,
                detail_ratio: table.detail_ratio(tier),
                tier: tier as u32,
                index: visible.index,
            });
        }

        Self { batches }
    }

    pub fn tier_count(&self) -> usize {
        self.batches.len()
    }

    /// Records of one tier (empty for an unknown tier).
    pub fn tier(&self, tier: u8) -> &[InstanceRecord] {
        self.batches.get(tier as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records of one tier as raw bytes for a GPU upload.
    pub fn as_bytes(&self, tier: u8) -> &[u8] {
        bytemuck::cast_slice(self.tier(tier))
    }

    /// Total number of instances over all tiers.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// (tier, records) for every non-empty tier.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[InstanceRecord])> {
        self.batches
            .iter()
            .enumerate()
            .filter(|(_, batch)| !batch.is_empty())
            .map(|(tier, batch)| (tier as u8, batch.as_slice()))
    }
}

#[cfg(test)]
#[path = "draw_order_tests.rs"]
mod tests;
