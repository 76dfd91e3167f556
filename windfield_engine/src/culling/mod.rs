//! Culling module: per-frame visible sets, frame-to-frame coherence,
//! viewports and draw ordering.

pub mod coherence;
pub mod culler;
pub mod draw_order;
pub mod viewport;

pub use coherence::{CoherenceDiff, FrameCoherenceCache, VisibilityRecord};
pub use culler::{Candidate, CullStats, VisibilityCuller, VisibleFrame, VisibleObject};
pub use draw_order::{sort_by_distance, DrawOrder, InstanceRecord, TierBatches};
pub use viewport::{Viewport, ViewportKey, ViewportSet};
