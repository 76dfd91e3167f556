//! SpatialIndex: static quadtree/octree over a borrowed object slice.
//!
//! Nodes live in a flat array and objects are referenced by `u32` index into
//! the caller's slice. The build permutes a single index buffer in place so
//! that every node owns one contiguous range of it:
//!
//! ```text
//! items: [ own objects | child 0 subtree | child 1 subtree | ... ]
//!          start..own_end                                  ..end
//! ```
//!
//! Accepting a whole subtree during a query is therefore one slice copy.
//!
//! Each object is stored in exactly one node. Classification uses per-node
//! *cull bounds* (the union of the padded bounding-sphere boxes of the
//! subtree), not the partition region, so objects whose sphere pokes out of
//! their node are never lost.
//!
//! The index is immutable once built. A new population (e.g. a year filter
//! change) means a new index with a new generation number.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use glam::Vec3;
use rustc_hash::FxHashSet;
use crate::config::CullingConfig;
use crate::error::Result;
use crate::{engine_bail, engine_info, engine_trace, engine_warn};
use super::aabb::AABB;
use super::object::SpatialObject;
use super::partition::{PartitionKind, PlacementPolicy};
use super::query_volume::{Containment, QueryVolume};

const SOURCE: &str = "windfield::SpatialIndex";

/// Index of the root node in the flat node array.
const ROOT: usize = 0;

/// Bucket of objects that stay at the node being split (extent placement).
const STAY: usize = 0;

/// Source of build generation numbers (0 is never handed out).
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A single node of the tree.
#[derive(Debug, Clone)]
struct IndexNode {
    /// Partition region
    region: AABB,
    /// Union of the padded sphere boxes of every object in the subtree
    /// (`AABB::EMPTY` if the subtree holds nothing)
    cull_bounds: AABB,
    /// Subtree range in `items`
    start: usize,
    end: usize,
    /// End of the objects held directly by this node (`start..own_end`)
    own_end: usize,
    /// Index of the first child in the flat array (0 = leaf)
    first_child: usize,
    depth: u32,
}

impl IndexNode {
    fn is_leaf(&self) -> bool {
        self.first_child == 0
    }
}

/// Non-fatal conditions detected while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildWarning {
    /// No objects: the index is a single empty leaf.
    EmptyInput,
    /// Several objects but zero extent along the split axes: subdivision
    /// cannot separate them and the depth cap ends the descent.
    DegenerateGeometry { objects: usize },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::EmptyInput => write!(f, "empty input, index holds no objects"),
            BuildWarning::DegenerateGeometry { objects } => write!(
                f,
                "degenerate geometry, {} objects span zero extent along the split axes",
                objects
            ),
        }
    }
}

/// Summary of a build.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub object_count: usize,
    /// Depth of the deepest node (root = 0)
    pub max_depth: u32,
    /// Mean object count over non-empty leaves
    pub avg_objects_per_leaf: f32,
    pub build_time: Duration,
    pub warnings: Vec<BuildWarning>,
}

/// Counters of one query traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Nodes whose cull bounds were classified
    pub nodes_visited: usize,
    /// Subtrees pruned as fully outside
    pub nodes_culled: usize,
    /// Subtrees accepted as fully inside
    pub nodes_accepted: usize,
    /// Per-object sphere tests
    pub objects_tested: usize,
}

/// Static hierarchical spatial index over a borrowed object slice.
pub struct SpatialIndex<'a, P = ()> {
    objects: &'a [SpatialObject<P>],
    nodes: Vec<IndexNode>,
    /// Object indices, permuted so that each subtree is contiguous
    items: Vec<u32>,
    partition: PartitionKind,
    placement: PlacementPolicy,
    padding: f32,
    generation: u64,
    stats: IndexStats,
}

impl<'a, P> SpatialIndex<'a, P> {
    /// Build an index over `objects`.
    ///
    /// `bounds` is the root region; when `None` the tight bounds of all
    /// positions are used. When given it must be finite, non-inverted and
    /// contain every object position.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the configuration does not validate
    /// - `InvalidObject` for a non-finite position, a negative or non-finite
    ///   radius, a duplicate id or a position outside `bounds`
    /// - `InvalidBounds` for unusable explicit bounds
    ///
    /// Empty input and zero-extent geometry are not errors; they are
    /// reported in [`IndexStats::warnings`].
    pub fn build(
        objects: &'a [SpatialObject<P>],
        bounds: Option<AABB>,
        config: &CullingConfig,
    ) -> Result<Self> {
        let started = Instant::now();
        config.validate()?;

        if objects.len() > u32::MAX as usize {
            engine_bail!(InvalidObject, SOURCE, "{} objects exceed the u32 index range", objects.len());
        }

        let mut ids = FxHashSet::default();
        ids.reserve(objects.len());
        for (i, object) in objects.iter().enumerate() {
            if !object.position.is_finite() {
                engine_bail!(InvalidObject, SOURCE,
                    "object {} (slot {}) has non-finite position {:?}", object.id, i, object.position);
            }
            if !object.is_well_formed() {
                engine_bail!(InvalidObject, SOURCE,
                    "object {} (slot {}) has invalid radius {}", object.id, i, object.radius);
            }
            if !ids.insert(object.id) {
                engine_bail!(InvalidObject, SOURCE, "duplicate object id {}", object.id);
            }
        }

        let region = match bounds {
            Some(b) => {
                if !b.is_finite() || b.is_empty() {
                    engine_bail!(InvalidBounds, SOURCE, "unusable index bounds {:?}", b);
                }
                if let Some(outside) = objects.iter().find(|o| !b.contains_point(o.position)) {
                    engine_bail!(InvalidObject, SOURCE,
                        "object {} at {:?} lies outside the index bounds", outside.id, outside.position);
                }
                b
            }
            None if objects.is_empty() => AABB::new(Vec3::ZERO, Vec3::ZERO),
            None => AABB::from_points(objects.iter().map(|o| o.position)),
        };

        let mut warnings = Vec::new();
        if objects.is_empty() {
            engine_warn!(SOURCE, "Building index over an empty object set");
            warnings.push(BuildWarning::EmptyInput);
        } else if objects.len() > 1 && region.is_flat_along(config.partition.split_axes()) {
            engine_warn!(SOURCE,
                "{} objects span zero extent; subdivision stops at depth {}",
                objects.len(), config.max_depth);
            warnings.push(BuildWarning::DegenerateGeometry { objects: objects.len() });
        }

        let mut index = Self {
            objects,
            nodes: Vec::new(),
            items: (0..objects.len() as u32).collect(),
            partition: config.partition,
            placement: config.placement,
            padding: config.frustum_padding,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            stats: IndexStats {
                node_count: 0,
                leaf_count: 0,
                object_count: objects.len(),
                max_depth: 0,
                avg_objects_per_leaf: 0.0,
                build_time: Duration::ZERO,
                warnings,
            },
        };

        index.subdivide(region, config.max_objects_per_leaf, config.max_depth);
        index.compute_cull_bounds();
        index.collect_stats(started.elapsed());

        engine_info!(SOURCE,
            "Built {:?} over {} objects: {} nodes, {} leaves, depth {}, {:.2} per leaf, generation {} ({:.2?})",
            index.partition, index.stats.object_count, index.stats.node_count,
            index.stats.leaf_count, index.stats.max_depth, index.stats.avg_objects_per_leaf,
            index.generation, index.stats.build_time);

        Ok(index)
    }

    /// Iterative top-down subdivision with an explicit stack.
    ///
    /// Each split is a counting sort of the node's item range by child code,
    /// so children end up contiguous and in code order.
    fn subdivide(&mut self, region: AABB, max_per_leaf: usize, max_depth: u32) {
        let objects = self.objects;
        let (partition, placement) = (self.partition, self.placement);
        let child_count = partition.child_count();

        self.nodes.push(IndexNode {
            region,
            cull_bounds: AABB::EMPTY,
            start: 0,
            end: self.items.len(),
            own_end: self.items.len(),
            first_child: 0,
            depth: 0,
        });

        let mut stack = vec![ROOT];
        let mut buckets: Vec<u8> = Vec::new();
        let mut scratch: Vec<u32> = Vec::new();

        while let Some(node_idx) = stack.pop() {
            let (start, end, depth, region) = {
                let node = &self.nodes[node_idx];
                (node.start, node.end, node.depth, node.region)
            };

            if end - start <= max_per_leaf || depth >= max_depth {
                continue;
            }

            let center = region.center();
            let slice = &mut self.items[start..end];

            // Bucket 0 = stays here, bucket 1 + code = child `code`
            buckets.clear();
            buckets.extend(slice.iter().map(|&i| {
                let object = &objects[i as usize];
                bucket_of(partition, placement, center, object.position, object.radius) as u8
            }));

            let mut counts = [0usize; 9];
            for &b in &buckets {
                counts[b as usize] += 1;
            }
            let mut offsets = [0usize; 9];
            for b in 1..=child_count {
                offsets[b] = offsets[b - 1] + counts[b - 1];
            }

            scratch.clear();
            scratch.resize(slice.len(), 0);
            let mut cursor = offsets;
            for (&item, &b) in slice.iter().zip(&buckets) {
                scratch[cursor[b as usize]] = item;
                cursor[b as usize] += 1;
            }
            slice.copy_from_slice(&scratch);

            let first_child = self.nodes.len();
            {
                let node = &mut self.nodes[node_idx];
                node.own_end = start + counts[STAY];
                node.first_child = first_child;
            }

            for code in 0..child_count {
                let child_start = start + offsets[1 + code];
                let child_end = child_start + counts[1 + code];
                self.nodes.push(IndexNode {
                    region: partition.child_region(&region, center, code as u8),
                    cull_bounds: AABB::EMPTY,
                    start: child_start,
                    end: child_end,
                    own_end: child_end,
                    first_child: 0,
                    depth: depth + 1,
                });
            }

            // Reverse push keeps child 0 on top (depth-first, code order)
            for child in (first_child..first_child + child_count).rev() {
                if self.nodes[child].start != self.nodes[child].end {
                    stack.push(child);
                }
            }
        }
    }

    /// Bottom-up cull bounds. Children always sit after their parent in the
    /// flat array, so one reverse sweep sees every child before its parent.
    fn compute_cull_bounds(&mut self) {
        let child_count = self.partition.child_count();
        for node_idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[node_idx];
            let mut bounds = self.items[node.start..node.own_end]
                .iter()
                .map(|&i| {
                    let object = &self.objects[i as usize];
                    AABB::from_sphere(object.position, object.radius + self.padding)
                })
                .fold(AABB::EMPTY, |acc, b| acc.union(&b));

            if !node.is_leaf() {
                for child in node.first_child..node.first_child + child_count {
                    bounds = bounds.union(&self.nodes[child].cull_bounds);
                }
            }
            self.nodes[node_idx].cull_bounds = bounds;
        }
    }

    fn collect_stats(&mut self, build_time: Duration) {
        let leaves = self.nodes.iter().filter(|n| n.is_leaf());
        let (leaf_count, occupied, held) = leaves.fold((0, 0, 0), |(count, occupied, held), n| {
            let len = n.end - n.start;
            (count + 1, occupied + (len > 0) as usize, held + len)
        });

        self.stats.node_count = self.nodes.len();
        self.stats.leaf_count = leaf_count;
        self.stats.max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        self.stats.avg_objects_per_leaf = if occupied > 0 { held as f32 / occupied as f32 } else { 0.0 };
        self.stats.build_time = build_time;
    }

    // ===== QUERIES =====

    /// Collect the indices (into [`objects`](Self::objects)) of every object
    /// whose padded bounding sphere may touch `volume`.
    ///
    /// False positives are possible, false negatives are not. `results` is
    /// cleared first. Results come in no particular order.
    pub fn query<V: QueryVolume + ?Sized>(&self, volume: &V, results: &mut Vec<u32>) -> QueryStats {
        results.clear();
        let mut stats = QueryStats::default();
        if self.items.is_empty() {
            return stats;
        }

        let child_count = self.partition.child_count();
        let mut stack = Vec::with_capacity(child_count * (self.stats.max_depth as usize + 1));
        stack.push(ROOT);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            stats.nodes_visited += 1;

            match volume.classify_aabb(&node.cull_bounds) {
                Containment::Outside => {
                    stats.nodes_culled += 1;
                }
                Containment::Inside => {
                    stats.nodes_accepted += 1;
                    results.extend_from_slice(&self.items[node.start..node.end]);
                }
                Containment::Intersecting => {
                    for &i in &self.items[node.start..node.own_end] {
                        stats.objects_tested += 1;
                        let object = &self.objects[i as usize];
                        if volume.classify_sphere(object.position, object.radius + self.padding)
                            != Containment::Outside
                        {
                            results.push(i);
                        }
                    }

                    if !node.is_leaf() {
                        for child in node.first_child..node.first_child + child_count {
                            if self.nodes[child].start != self.nodes[child].end {
                                stack.push(child);
                            }
                        }
                    }
                }
            }
        }

        engine_trace!(SOURCE,
            "query: {} candidates, {} nodes visited, {} culled, {} accepted, {} objects tested",
            results.len(), stats.nodes_visited, stats.nodes_culled,
            stats.nodes_accepted, stats.objects_tested);

        stats
    }

    /// Linear reference scan: the same per-object predicate without the
    /// hierarchy. Used as a fallback and as the ground truth in tests.
    pub fn query_linear<V: QueryVolume + ?Sized>(&self, volume: &V, results: &mut Vec<u32>) {
        results.clear();
        results.extend(
            self.objects
                .iter()
                .enumerate()
                .filter(|(_, o)| volume.classify_sphere(o.position, o.radius + self.padding) != Containment::Outside)
                .map(|(i, _)| i as u32),
        );
    }

    // ===== ACCESSORS =====

    /// The borrowed object slice; query results index into it.
    pub fn objects(&self) -> &'a [SpatialObject<P>] {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Root partition region.
    pub fn bounds(&self) -> AABB {
        self.nodes[ROOT].region
    }

    /// Union of the padded bounding spheres of all objects.
    pub fn cull_bounds(&self) -> AABB {
        self.nodes[ROOT].cull_bounds
    }

    /// Process-unique number of this build. Coherence caches compare it to
    /// detect rebuilds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn partition(&self) -> PartitionKind {
        self.partition
    }

    pub fn placement(&self) -> PlacementPolicy {
        self.placement
    }

    /// Padding added to every bounding-sphere radius for culling.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.stats.warnings
    }
}

/// Bucket of an object at a node split at `center`.
fn bucket_of(
    partition: PartitionKind,
    placement: PlacementPolicy,
    center: Vec3,
    position: Vec3,
    radius: f32,
) -> usize {
    match placement {
        PlacementPolicy::Centroid => 1 + partition.child_code(center, position) as usize,
        PlacementPolicy::Extent => {
            let low = partition.child_code(center, position - Vec3::splat(radius));
            let high = partition.child_code(center, position + Vec3::splat(radius));
            if low == high { 1 + low as usize } else { STAY }
        }
    }
}

#[cfg(test)]
#[path = "spatial_index_tests.rs"]
mod tests;
