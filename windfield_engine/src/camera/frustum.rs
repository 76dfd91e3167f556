//! Frustum: six clipping planes extracted from camera transforms.
//!
//! Each plane is a Vec4 (A, B, C, D) with an inward-pointing unit normal
//! (A, B, C). A point P is on the visible side of a plane when
//! `dot(normal, P) + D >= 0`.
//!
//! Recomputed every frame from the combined view-projection matrix.

use glam::{Mat4, Vec3, Vec4};
use crate::spatial::{AABB, Containment, QueryVolume};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Normals shorter than this mark a plane that could not be extracted.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// Six frustum planes: left, right, bottom, top, near, far.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix
    /// (`projection * view`).
    ///
    /// Gribb & Hartmann: each plane is a sum or difference of the fourth
    /// row with one of the other rows. The near plane uses `row3 + row2`
    /// (clip-space `z >= -w`), which for a `[0, 1]` depth range keeps a
    /// sliver in front of the true near plane: a superset, never a subset.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();
        let row = |r: usize| Vec4::new(m[0][r], m[1][r], m[2][r], m[3][r]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        let mut planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r3 + r2, // near
            r3 - r2, // far
        ];

        for plane in &mut planes {
            let normal_len = plane.truncate().length();
            if normal_len > MIN_NORMAL_LENGTH {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// Extract from separate view and projection matrices.
    pub fn from_view_and_projection(view: &Mat4, projection: &Mat4) -> Self {
        Self::from_view_projection(&(*projection * *view))
    }

    /// True if any plane is non-finite or has a (near) zero normal.
    ///
    /// Such a frustum comes from a singular or corrupted camera transform;
    /// culling against it is meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.planes.iter().any(|p| {
            !p.is_finite() || p.truncate().length() < MIN_NORMAL_LENGTH
        })
    }

    /// Signed distance of a point to one plane (positive = inside).
    #[inline]
    pub fn signed_distance(&self, plane: usize, point: Vec3) -> f32 {
        let p = self.planes[plane];
        p.truncate().dot(point) + p.w
    }

    /// Sphere containment: `Outside` if the signed distance is below
    /// `-radius` for any plane, `Inside` if it is at least `radius` for all
    /// planes, `Intersecting` otherwise.
    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> Containment {
        let mut all_inside = true;
        for plane in 0..6 {
            let d = self.signed_distance(plane, center);
            if d < -radius {
                return Containment::Outside;
            }
            if d < radius {
                all_inside = false;
            }
        }
        if all_inside { Containment::Inside } else { Containment::Intersecting }
    }

    /// Box containment via the positive/negative vertex test.
    ///
    /// - p-vertex (corner furthest along the normal) outside any plane → `Outside`
    /// - n-vertex (corner furthest against the normal) outside a plane → straddles
    /// - all n-vertices inside → `Inside`
    pub fn contains_aabb(&self, aabb: &AABB) -> Containment {
        if aabb.is_empty() {
            return Containment::Outside;
        }

        let mut all_inside = true;
        for plane in &self.planes {
            let normal = plane.truncate();

            let p_vertex = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            if normal.dot(p_vertex) + plane.w < 0.0 {
                return Containment::Outside;
            }

            let n_vertex = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.min, aabb.max);
            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { Containment::Inside } else { Containment::Intersecting }
    }
}

impl QueryVolume for Frustum {
    fn classify_aabb(&self, aabb: &AABB) -> Containment {
        self.contains_aabb(aabb)
    }

    fn classify_sphere(&self, center: Vec3, radius: f32) -> Containment {
        self.contains_sphere(center, radius)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
