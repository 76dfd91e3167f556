//! Unit tests for draw_order.rs
//!
//! Tests instance layout, depth ordering and tier batches.

use glam::Vec3;
use crate::config::CullingConfig;
use crate::spatial::{ObjectId, SpatialObject};
use super::*;

fn visible(index: u32, distance: f32, tier: u8) -> VisibleObject {
    VisibleObject { id: ObjectId(index as u64), index, distance, tier }
}

#[test]
fn test_instance_record_layout() {
    assert_eq!(std::mem::size_of::<InstanceRecord>(), 32);
    assert_eq!(std::mem::align_of::<InstanceRecord>(), 4);
}

#[test]
fn test_front_to_back() {
    let mut objects = vec![
        visible(0, 5.0, 0),
        visible(1, 0.5, 0),
        visible(2, 300.0, 0),
        visible(3, 0.0, 0),
        visible(4, 42.25, 0),
    ];
    sort_by_distance(&mut objects, DrawOrder::FrontToBack);
    let order: Vec<u32> = objects.iter().map(|o| o.index).collect();
    assert_eq!(order, vec![3, 1, 0, 4, 2]);
}

#[test]
fn test_back_to_front() {
    let mut objects = vec![visible(0, 1.0, 0), visible(1, 3.0, 0), visible(2, 2.0, 0)];
    sort_by_distance(&mut objects, DrawOrder::BackToFront);
    let order: Vec<u32> = objects.iter().map(|o| o.index).collect();
    assert_eq!(order, vec![1, 2, 0]);
}

#[test]
fn test_sort_matches_comparison_sort() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(9);
    let mut objects: Vec<VisibleObject> = (0..5000)
        .map(|i| visible(i, rng.gen_range(0.0..10_000.0), 0))
        .collect();
    let mut expected: Vec<f32> = objects.iter().map(|o| o.distance).collect();
    expected.sort_by(|a, b| a.total_cmp(b));

    sort_by_distance(&mut objects, DrawOrder::FrontToBack);
    let sorted: Vec<f32> = objects.iter().map(|o| o.distance).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn test_batches_group_by_tier() {
    let objects = vec![
        SpatialObject::new(10u64, Vec3::new(0.0, 0.0, 0.0), 0.5, ()),
        SpatialObject::new(11u64, Vec3::new(1.0, 0.0, 0.0), 0.5, ()),
        SpatialObject::new(12u64, Vec3::new(2.0, 0.0, 0.0), 0.25, ()),
    ];
    let index = SpatialIndex::build(&objects, None, &CullingConfig::default()).unwrap();
    let table = LodTable::standard();

    let set = vec![visible(0, 1.0, 0), visible(1, 2.0, 2), visible(2, 3.0, 0)];
    let batches = TierBatches::build(&index, &set, &table);

    assert_eq!(batches.tier_count(), table.len());
    assert_eq!(batches.instance_count(), 3);
    assert_eq!(batches.tier(0).len(), 2);
    assert!(batches.tier(1).is_empty());
    assert_eq!(batches.tier(2).len(), 1);
    assert!(batches.tier(9).is_empty());

    let far = batches.tier(2)[0];
    assert_eq!(far.position, [1.0, 0.0, 0.0]);
    assert_eq!(far.radius, 0.5);
    assert_eq!(far.tier, 2);
    assert_eq!(far.detail_ratio, table.detail_ratio(2));

    assert_eq!(batches.as_bytes(0).len(), 64);
    let tiers: Vec<u8> = batches.iter().map(|(t, _)| t).collect();
    assert_eq!(tiers, vec![0, 2]);
}

#[test]
fn test_batches_clamp_stale_tiers_and_skip_foreign_indices() {
    let objects = vec![SpatialObject::new(1u64, Vec3::ZERO, 1.0, ())];
    let index = SpatialIndex::build(&objects, None, &CullingConfig::default()).unwrap();
    let table = LodTable::standard();

    let set = vec![visible(0, 1.0, 7), visible(5, 1.0, 0)];
    let batches = TierBatches::build(&index, &set, &table);
    assert_eq!(batches.instance_count(), 1);
    assert_eq!(batches.tier(table.last_tier()).len(), 1);
}
