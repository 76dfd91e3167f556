//! Unit tests for lod_table.rs
//!
//! Tests table validation, built-in tables and tier assignment.

use crate::error::Error;
use super::*;

// ============================================================================
// Built-in tables
// ============================================================================

#[test]
fn test_builtin_tables_validate() {
    for mode in [LodMode::Standard, LodMode::Aggressive, LodMode::Extreme] {
        let table = LodTable::for_mode(mode);
        assert_eq!(LodTable::new(table.tiers().to_vec()), Ok(table));
    }
}

#[test]
fn test_builtin_tier_counts() {
    assert_eq!(LodTable::standard().len(), 3);
    assert_eq!(LodTable::aggressive().len(), 5);
    assert_eq!(LodTable::extreme().len(), 5);
}

#[test]
fn test_standard_bands() {
    let table = LodTable::standard();
    assert_eq!(table.assign_tier(0.0), 0);
    assert_eq!(table.assign_tier(0.29), 0);
    assert_eq!(table.assign_tier(0.3), 1);
    assert_eq!(table.assign_tier(0.79), 1);
    assert_eq!(table.assign_tier(0.8), 2);
    assert_eq!(table.assign_tier(1e9), 2);
}

#[test]
fn test_aggressive_geometry_hints() {
    let table = LodTable::aggressive();
    let segments: Vec<u8> = table.tiers().iter().map(|t| t.segments).collect();
    let blades: Vec<u8> = table.tiers().iter().map(|t| t.blades).collect();
    assert_eq!(segments, vec![8, 6, 4, 4, 3]);
    assert_eq!(blades, vec![3, 3, 3, 1, 0]);

    assert_eq!(table.tier(3).features, TierFeatures::SKIP_NACELLE);
    assert!(table.tier(4).features.contains(TierFeatures::BILLBOARD | TierFeatures::SKIP_BLADES));
}

#[test]
fn test_extreme_drops_blades_early() {
    let table = LodTable::extreme();
    assert_eq!(table.tier(1).blades, 2);
    assert_eq!(table.tier(3).blades, 0);
    assert!(table.tier(3).features.contains(TierFeatures::SKIP_BLADES));
    assert!(!table.tier(3).features.contains(TierFeatures::BILLBOARD));
    assert!((table.detail_ratio(4) - 0.01).abs() < 1e-6);
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_three_tier_table_scenario() {
    let table = LodTable::from_pairs(&[(0.5, 1.0), (2.0, 0.5), (f32::INFINITY, 0.1)]).unwrap();
    assert_eq!(table.assign_tier(1.5), 1);
    assert_eq!(table.assign_tier(0.1), 0);
    assert_eq!(table.assign_tier(2.0), 2);
}

#[test]
fn test_assignment_is_monotonic() {
    for table in [LodTable::standard(), LodTable::aggressive(), LodTable::extreme()] {
        let mut previous = 0;
        for step in 0..2000 {
            let tier = table.assign_tier(step as f32 * 0.001);
            assert!(tier >= previous);
            previous = tier;
        }
        assert_eq!(previous, table.last_tier());
    }
}

#[test]
fn test_bounded_last_tier_clamps() {
    let table = LodTable::from_pairs(&[(1.0, 1.0), (2.0, 0.5)]).unwrap();
    assert_eq!(table.assign_tier(5.0), 1);
}

#[test]
fn test_nan_and_negative_distances() {
    let table = LodTable::standard();
    assert_eq!(table.assign_tier(f32::NAN), 2);
    assert_eq!(table.assign_tier(-3.0), 0);
    assert_eq!(table.assign_tier(f32::INFINITY), 2);
}

#[test]
fn test_tier_index_clamped() {
    let table = LodTable::standard();
    assert_eq!(table.tier(200), table.tier(2));
}

// ============================================================================
// Validation
// ============================================================================

fn assert_rejected(pairs: &[(f32, f32)]) {
    assert!(matches!(LodTable::from_pairs(pairs), Err(Error::InvalidLodTable(_))), "{:?}", pairs);
}

#[test]
fn test_empty_table_rejected() {
    assert_rejected(&[]);
}

#[test]
fn test_non_increasing_thresholds_rejected() {
    assert_rejected(&[(1.0, 1.0), (1.0, 0.5)]);
    assert_rejected(&[(2.0, 1.0), (1.0, 0.5)]);
}

#[test]
fn test_bad_thresholds_rejected() {
    assert_rejected(&[(0.0, 1.0)]);
    assert_rejected(&[(-1.0, 1.0)]);
    assert_rejected(&[(f32::NAN, 1.0)]);
    assert_rejected(&[(f32::INFINITY, 1.0), (f32::INFINITY, 0.5)]);
}

#[test]
fn test_increasing_ratios_rejected() {
    assert_rejected(&[(1.0, 0.5), (2.0, 0.8)]);
}

#[test]
fn test_ratio_range_checked() {
    assert_rejected(&[(1.0, 1.5)]);
    assert_rejected(&[(1.0, -0.1)]);
    assert_rejected(&[(1.0, f32::NAN)]);
}

#[test]
fn test_geometry_hints_checked() {
    let mut tier = LodTier::new(1.0, 1.0);
    tier.segments = 2;
    assert!(matches!(LodTable::new(vec![tier]), Err(Error::InvalidLodTable(_))));

    let mut tier = LodTier::new(1.0, 1.0);
    tier.blades = 4;
    assert!(matches!(LodTable::new(vec![tier]), Err(Error::InvalidLodTable(_))));
}

#[test]
fn test_equal_ratios_rejected() {
    assert_rejected(&[(1.0, 0.5), (2.0, 0.5)]);
    assert_rejected(&[(1.0, 1.0), (2.0, 0.5), (f32::INFINITY, 0.5)]);
    assert!(LodTable::from_pairs(&[(1.0, 0.5), (2.0, 0.49)]).is_ok());
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn test_mode_parsing() {
    assert_eq!("standard".parse::<LodMode>(), Ok(LodMode::Standard));
    assert_eq!(" Aggressive ".parse::<LodMode>(), Ok(LodMode::Aggressive));
    assert_eq!("EXTREME".parse::<LodMode>(), Ok(LodMode::Extreme));
    assert!(matches!("ultra".parse::<LodMode>(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_mode_display_round_trip() {
    for mode in [LodMode::Standard, LodMode::Aggressive, LodMode::Extreme] {
        assert_eq!(mode.to_string().parse::<LodMode>(), Ok(mode));
    }
}

#[test]
fn test_mode_for_population() {
    assert_eq!(LodMode::for_population(500), LodMode::Standard);
    assert_eq!(LodMode::for_population(10_000), LodMode::Standard);
    assert_eq!(LodMode::for_population(10_001), LodMode::Aggressive);
    assert_eq!(LodMode::for_population(25_000), LodMode::Aggressive);
    assert_eq!(LodMode::for_population(29_722), LodMode::Extreme);
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_estimated_savings() {
    let table = LodTable::standard();
    assert_eq!(table.estimated_savings(&[]), 0.0);
    assert_eq!(table.estimated_savings(&[0, 0, 0]), 0.0);
    assert!((table.estimated_savings(&[10, 0, 0]) - 0.0).abs() < 1e-6);
    // Half at 100 %, half at 50 % → mean 75 %
    assert!((table.estimated_savings(&[5, 5, 0]) - 0.25).abs() < 1e-6);
    assert!((table.estimated_savings(&[0, 0, 4]) - 0.9).abs() < 1e-6);
}

#[test]
fn test_summary_lists_features() {
    let summary = LodTable::aggressive().summary();
    assert_eq!(summary.lines().count(), 5);
    assert!(summary.contains("billboard"));
    assert!(summary.lines().next().unwrap().starts_with("LOD0"));
}
