//! Object records handed to the spatial index.

use glam::Vec3;

/// Caller-assigned stable identifier of an object.
///
/// Must be unique within one build; the coherence cache keys its records
/// on it so that visibility survives index rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        ObjectId(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point object with a bounding sphere and an opaque payload.
///
/// The index never looks at the payload; it is carried so that callers can
/// keep their own attributes (power rating, construction year, ...) next to
/// the geometry in a single slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialObject<P = ()> {
    pub id: ObjectId,
    pub position: Vec3,
    pub radius: f32,
    pub payload: P,
}

impl<P> SpatialObject<P> {
    pub fn new(id: impl Into<ObjectId>, position: Vec3, radius: f32, payload: P) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            payload,
        }
    }

    /// Object standing on the ground plane (`y = 0`) at map coordinates (x, z).
    pub fn on_ground(id: impl Into<ObjectId>, x: f32, z: f32, radius: f32, payload: P) -> Self {
        Self::new(id, Vec3::new(x, 0.0, z), radius, payload)
    }

    /// Build-contract check: finite position, finite non-negative radius.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.position.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}
