//! Spatial module: bounding volumes, object records and the hierarchical
//! index the culler walks every frame.

pub mod aabb;
pub mod object;
pub mod partition;
pub mod query_volume;
pub mod spatial_index;

pub use aabb::AABB;
pub use object::{ObjectId, SpatialObject};
pub use partition::{PartitionKind, PlacementPolicy};
pub use query_volume::{Containment, QueryVolume};
pub use spatial_index::{BuildWarning, IndexStats, QueryStats, SpatialIndex};
