/*!
# Windfield Engine

Visibility engine for very large sets of static, point-like objects spread
over terrain (wind turbines, pylons, trees).

Every frame the caller hands a camera to the culler, which returns the
objects whose bounding sphere may intersect the view frustum, each tagged
with a level-of-detail tier, plus the difference from the previous frame.

## Architecture

- **SpatialIndex**: immutable quadtree/octree over a borrowed object slice,
  rebuilt wholesale when the population changes
- **Frustum / CameraState**: clip planes extracted from a view-projection matrix
- **LodTable / LodSelector**: distance or screen-size thresholds to tiers
- **VisibilityCuller**: index query + LOD assignment + coherence diff
- **FrameCoherenceCache / ViewportSet**: per-camera previous-frame state
- **TierBatches**: visible set grouped by tier for instanced drawing
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod config;
pub mod culling;
pub mod lod;
pub mod spatial;

// Main windfield namespace module
pub mod windfield {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{CullingConfig, RenderingTier};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod spatial {
        pub use crate::spatial::*;
    }

    pub mod lod {
        pub use crate::lod::*;
    }

    pub mod culling {
        pub use crate::culling::*;
    }
}

// Re-export math library at crate root
pub use glam;
