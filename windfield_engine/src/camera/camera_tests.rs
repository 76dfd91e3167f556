//! Unit tests for camera.rs
//!
//! Tests CameraState construction, eye recovery and the derived frustum.

use glam::{Mat4, Vec3};
use crate::spatial::Containment;
use super::*;

fn test_camera() -> CameraState {
    CameraState::look_at_perspective(
        Vec3::new(0.0, 2.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        std::f32::consts::FRAC_PI_4,
        16.0 / 9.0,
        0.1,
        100.0,
    )
}

#[test]
fn test_camera_new() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);

    let camera = CameraState::new(view, proj);

    assert_eq!(*camera.view(), view);
    assert_eq!(*camera.projection(), proj);
    assert_eq!(camera.view_projection(), proj * view);
}

#[test]
fn test_position_from_inverse_view() {
    let position = test_camera().position();
    assert!((position - Vec3::new(0.0, 2.0, 5.0)).length() < 1e-4);
}

#[test]
fn test_frustum_sees_target() {
    let camera = test_camera();
    assert_eq!(camera.frustum().contains_sphere(Vec3::ZERO, 0.5), Containment::Inside);
    assert_eq!(
        camera.frustum().contains_sphere(Vec3::new(0.0, 0.0, 50.0), 0.5),
        Containment::Outside
    );
}

#[test]
fn test_setters() {
    let mut camera = test_camera();
    let view = Mat4::look_at_rh(Vec3::new(3.0, 1.0, 0.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);

    camera.set_view(view);
    camera.set_projection(proj);

    assert_eq!(*camera.view(), view);
    assert_eq!(*camera.projection(), proj);
    assert!((camera.position() - Vec3::new(3.0, 1.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_singular_view_gives_degenerate_frustum() {
    let camera = CameraState::new(Mat4::ZERO, Mat4::ZERO);
    assert!(camera.frustum().is_degenerate());
}
