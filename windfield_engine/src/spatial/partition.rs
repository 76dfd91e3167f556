//! Partition geometry shared by the quadtree and octree layouts.

use glam::Vec3;
use super::aabb::AABB;

/// How a node's region is subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PartitionKind {
    /// 4 children splitting the horizontal x/z plane; every node keeps the
    /// full vertical span of its parent.
    #[default]
    Quadtree,
    /// 8 children splitting all three axes.
    Octree,
}

impl PartitionKind {
    /// Number of children of an internal node.
    pub fn child_count(self) -> usize {
        match self {
            PartitionKind::Quadtree => 4,
            PartitionKind::Octree => 8,
        }
    }

    /// Mask of the axes that are split (1.0 = split, 0.0 = kept whole).
    pub fn split_axes(self) -> Vec3 {
        match self {
            PartitionKind::Quadtree => Vec3::new(1.0, 0.0, 1.0),
            PartitionKind::Octree => Vec3::ONE,
        }
    }

    /// Child a point falls into relative to a split center.
    ///
    /// Quadtree bit layout: bit0 = X, bit1 = Z.
    /// Octree bit layout: bit0 = X, bit1 = Y, bit2 = Z.
    /// A coordinate equal to the center goes to the high side.
    pub fn child_code(self, center: Vec3, point: Vec3) -> u8 {
        match self {
            PartitionKind::Quadtree => {
                ((point.x >= center.x) as u8) | (((point.z >= center.z) as u8) << 1)
            }
            PartitionKind::Octree => {
                ((point.x >= center.x) as u8)
                    | (((point.y >= center.y) as u8) << 1)
                    | (((point.z >= center.z) as u8) << 2)
            }
        }
    }

    /// Region of child `code` of `parent`, split at `center`.
    pub fn child_region(self, parent: &AABB, center: Vec3, code: u8) -> AABB {
        let (x_high, y_high, z_high) = match self {
            PartitionKind::Quadtree => (code & 1 != 0, None, code & 2 != 0),
            PartitionKind::Octree => (code & 1 != 0, Some(code & 2 != 0), code & 4 != 0),
        };

        let (min_y, max_y) = match y_high {
            None => (parent.min.y, parent.max.y),
            Some(false) => (parent.min.y, center.y),
            Some(true) => (center.y, parent.max.y),
        };

        AABB {
            min: Vec3::new(
                if x_high { center.x } else { parent.min.x },
                min_y,
                if z_high { center.z } else { parent.min.z },
            ),
            max: Vec3::new(
                if x_high { parent.max.x } else { center.x },
                max_y,
                if z_high { parent.max.z } else { center.z },
            ),
        }
    }
}

/// Where an object whose bounding sphere crosses a split plane is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementPolicy {
    /// By position only: every object sinks to the child holding its center.
    /// Node cull bounds absorb the radius, so straddling never loses objects.
    #[default]
    Centroid,
    /// An object whose sphere box straddles a split stays at the internal
    /// node that split it.
    Extent,
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
