//! Axis-aligned bounding boxes for the spatial index.
//!
//! Used both as partition regions (quadrants/octants) and as cull bounds
//! (union of the padded bounding-sphere boxes held by a subtree).

use glam::Vec3;
use super::query_volume::{Containment, QueryVolume};

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// The empty box: contains nothing, and is the identity for `union`.
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box tightly enclosing a sphere.
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            min: center - Vec3::splat(radius),
            max: center + Vec3::splat(radius),
        }
    }

    /// Tight box around a set of points (`EMPTY` if there are none).
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points.into_iter().fold(AABB::EMPTY, |acc, p| acc.grown(p))
    }

    /// True if the box contains no point (min > max on some axis).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True if both corners are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True if the box has zero extent along every axis of `axes`
    /// (a mask of 1.0 / 0.0 components selecting the split axes).
    pub fn is_flat_along(&self, axes: Vec3) -> bool {
        let size = self.size() * axes;
        size.x <= 0.0 && size.y <= 0.0 && size.z <= 0.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Smallest box containing this box and a point.
    pub fn grown(&self, point: Vec3) -> AABB {
        AABB {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Box inflated by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> AABB {
        AABB {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x
        && p.y >= self.min.y && p.y <= self.max.y
        && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

// ===== QUERY VOLUME =====

/// Rectangular region queries (the view-bounds pre-filter of a top-down map).
///
/// Spheres are approximated by their enclosing box, which only ever adds
/// false positives.
impl QueryVolume for AABB {
    fn classify_aabb(&self, aabb: &AABB) -> Containment {
        if aabb.is_empty() || !self.intersects(aabb) {
            Containment::Outside
        } else if self.contains(aabb) {
            Containment::Inside
        } else {
            Containment::Intersecting
        }
    }

    fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment {
        self.classify_aabb(&AABB::from_sphere(center, radius))
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
