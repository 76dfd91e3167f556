//! Unit tests for frustum.rs
//!
//! Tests plane extraction, degeneracy detection and sphere and box classification.

use glam::{Mat4, Vec3};
use crate::spatial::{AABB, Containment, QueryVolume};
use super::*;

fn perspective_frustum() -> Frustum {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    Frustum::from_view_and_projection(&view, &projection)
}

fn ortho_frustum() -> Frustum {
    let projection = Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
    Frustum::from_view_projection(&projection)
}

/// Top-down orthographic camera above the unit square, looking down -Y.
/// Camera x follows world x, camera y follows world -z.
fn top_down(left: f32, right: f32) -> Frustum {
    let view = Mat4::look_at_rh(Vec3::new(0.5, 10.0, 0.5), Vec3::new(0.5, 0.0, 0.5), Vec3::NEG_Z);
    let projection = Mat4::orthographic_rh(left, right, -0.5, 0.5, 0.1, 100.0);
    Frustum::from_view_and_projection(&view, &projection)
}

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_planes_are_normalized() {
    for frustum in [perspective_frustum(), ortho_frustum(), top_down(-0.5, 0.5)] {
        for plane in &frustum.planes {
            assert!((plane.truncate().length() - 1.0).abs() < 1e-4);
        }
        assert!(!frustum.is_degenerate());
    }
}

#[test]
fn test_identity_is_ndc_cube() {
    let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);
    assert_eq!(frustum.contains_sphere(Vec3::ZERO, 0.5), Containment::Inside);
    assert_eq!(frustum.contains_sphere(Vec3::new(3.0, 0.0, 0.0), 0.5), Containment::Outside);
}

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}

#[test]
fn test_right_plane_faces_inward() {
    let frustum = ortho_frustum();
    assert!(frustum.signed_distance(PLANE_RIGHT, Vec3::new(4.0, 0.0, -10.0)) > 0.0);
    assert!(frustum.signed_distance(PLANE_RIGHT, Vec3::new(6.0, 0.0, -10.0)) < 0.0);
}

// ============================================================================
// Degeneracy
// ============================================================================

#[test]
fn test_zero_matrix_is_degenerate() {
    assert!(Frustum::from_view_projection(&Mat4::ZERO).is_degenerate());
}

#[test]
fn test_nan_matrix_is_degenerate() {
    let nan = Mat4::from_cols_array(&[f32::NAN; 16]);
    assert!(Frustum::from_view_projection(&nan).is_degenerate());
}

// ============================================================================
// Sphere containment
// ============================================================================

#[test]
fn test_sphere_inside() {
    assert_eq!(perspective_frustum().contains_sphere(Vec3::ZERO, 1.0), Containment::Inside);
}

#[test]
fn test_sphere_outside_to_the_side() {
    assert_eq!(
        perspective_frustum().contains_sphere(Vec3::new(100.0, 0.0, 0.0), 1.0),
        Containment::Outside
    );
}

#[test]
fn test_sphere_behind_camera() {
    assert_eq!(
        perspective_frustum().contains_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0),
        Containment::Outside
    );
}

#[test]
fn test_sphere_beyond_far_plane() {
    assert_eq!(
        perspective_frustum().contains_sphere(Vec3::new(0.0, 0.0, -200.0), 1.0),
        Containment::Outside
    );
}

#[test]
fn test_sphere_straddling_side_plane() {
    assert_eq!(
        ortho_frustum().contains_sphere(Vec3::new(5.0, 0.0, -10.0), 1.0),
        Containment::Intersecting
    );
    // Center outside but within one radius
    assert_eq!(
        ortho_frustum().contains_sphere(Vec3::new(5.5, 0.0, -10.0), 1.0),
        Containment::Intersecting
    );
}

#[test]
fn test_zero_radius_sphere_is_a_point() {
    let frustum = ortho_frustum();
    assert_ne!(frustum.contains_sphere(Vec3::new(4.9, 0.0, -10.0), 0.0), Containment::Outside);
    assert_eq!(frustum.contains_sphere(Vec3::new(5.1, 0.0, -10.0), 0.0), Containment::Outside);
}

// ============================================================================
// AABB containment
// ============================================================================

#[test]
fn test_aabb_classification() {
    let frustum = ortho_frustum();

    let inside = AABB::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -10.0));
    let straddling = AABB::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));
    let outside = AABB::new(Vec3::new(10.0, 0.0, -10.0), Vec3::new(11.0, 1.0, -5.0));

    assert_eq!(frustum.contains_aabb(&inside), Containment::Inside);
    assert_eq!(frustum.contains_aabb(&straddling), Containment::Intersecting);
    assert_eq!(frustum.contains_aabb(&outside), Containment::Outside);
    assert_eq!(frustum.contains_aabb(&AABB::EMPTY), Containment::Outside);
}

#[test]
fn test_aabb_inside_implies_spheres_inside() {
    let frustum = perspective_frustum();
    let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    assert_eq!(frustum.contains_aabb(&aabb), Containment::Inside);
    for corner in [Vec3::splat(-0.5), Vec3::splat(0.5), Vec3::new(0.5, -0.5, 0.5)] {
        assert_eq!(frustum.contains_sphere(corner, 0.5), Containment::Inside);
    }
}

// ============================================================================
// Top-down map camera
// ============================================================================

#[test]
fn test_top_down_full_square() {
    let frustum = top_down(-0.5, 0.5);
    let square = AABB::new(Vec3::new(0.001, 0.0, 0.001), Vec3::new(0.999, 0.0, 0.999));
    assert_eq!(frustum.contains_aabb(&square), Containment::Inside);
}

#[test]
fn test_top_down_left_half() {
    let frustum = top_down(-0.5, 0.0);
    assert_eq!(frustum.contains_sphere(Vec3::new(0.25, 0.0, 0.25), 0.001), Containment::Inside);
    assert_eq!(frustum.contains_sphere(Vec3::new(0.25, 0.0, 0.9), 0.001), Containment::Inside);
    assert_eq!(frustum.contains_sphere(Vec3::new(0.75, 0.0, 0.5), 0.001), Containment::Outside);
    assert_eq!(frustum.contains_sphere(Vec3::new(0.5, 0.0, 0.5), 0.001), Containment::Intersecting);
}

#[test]
fn test_query_volume_delegates() {
    let frustum = ortho_frustum();
    let aabb = AABB::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), frustum.contains_aabb(&aabb));
    assert_eq!(
        frustum.classify_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0),
        Containment::Inside
    );
}
