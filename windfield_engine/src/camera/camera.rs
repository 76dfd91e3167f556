//! CameraState: the per-frame camera input of the culler.
//!
//! A passive container for the view and projection matrices supplied by the
//! external camera controller. Everything the culler needs (combined matrix,
//! frustum, eye position) is derived from those two matrices.

use glam::{Mat4, Vec3};
use super::frustum::Frustum;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    view: Mat4,
    projection: Mat4,
}

impl CameraState {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Right-handed perspective camera at `eye` looking at `target`.
    pub fn look_at_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh(fov_y, aspect, near, far),
        }
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Clipping planes of this camera.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// World-space eye position, taken from the inverse view matrix.
    ///
    /// A singular view matrix yields non-finite components.
    pub fn position(&self) -> Vec3 {
        self.view.inverse().w_axis.truncate()
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
