//! Query volumes: anything the spatial index can be queried with.

use glam::Vec3;
use super::aabb::AABB;

/// Result of a 3-way volume classification.
///
/// Drives the hierarchical traversal:
/// - `Outside` → skip the entire subtree
/// - `Inside` → accept the whole subtree without per-object tests
/// - `Intersecting` → test the node's own objects and descend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Containment {
    Outside,
    Inside,
    Intersecting,
}

/// A convex volume the index can be queried with.
///
/// Implementations must be conservative: reporting `Outside` for a box or
/// sphere that actually touches the volume loses objects.
pub trait QueryVolume {
    /// Classify an axis-aligned box (node cull bounds).
    fn classify_aabb(&self, aabb: &AABB) -> Containment;

    /// Classify a bounding sphere (per-object test).
    fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment;
}

impl<V: QueryVolume + ?Sized> QueryVolume for &V {
    fn classify_aabb(&self, aabb: &AABB) -> Containment {
        (**self).classify_aabb(aabb)
    }

    fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment {
        (**self).classify_sphere(center, radius)
    }
}
