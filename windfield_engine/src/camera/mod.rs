//! Camera module: per-frame camera state and frustum extraction.
//!
//! The engine does NOT own cameras. The caller drives them and hands a
//! `CameraState` to the culler each frame.

mod camera;
mod frustum;

pub use camera::CameraState;
pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
