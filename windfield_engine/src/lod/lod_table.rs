//! LOD tier tables: ordered distance bands with their detail budgets.
//!
//! Each tier covers distances up to (excluding) its `max_distance`; the last
//! tier is usually unbounded (`f32::INFINITY`). Tier 0 is full detail.

use std::fmt;
use std::str::FromStr;
use bitflags::bitflags;
use crate::error::{Error, Result};
use crate::{engine_bail, engine_err};

const SOURCE: &str = "windfield::LodTable";

bitflags! {
    /// Geometry parts a renderer may drop at a tier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TierFeatures: u8 {
        /// Draw the tower without the nacelle.
        const SKIP_NACELLE = 1 << 0;
        /// Draw no rotor blades.
        const SKIP_BLADES = 1 << 1;
        /// Replace geometry with a camera-facing billboard.
        const BILLBOARD = 1 << 2;
    }
}

/// One distance band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodTier {
    /// Upper bound (exclusive) of the band, in selector units
    pub max_distance: f32,
    /// Fraction of full polygon detail, in [0, 1]
    pub detail_ratio: f32,
    /// Segment count for cylindrical parts (tower, nacelle)
    pub segments: u8,
    /// Rotor blade count, 0..=3
    pub blades: u8,
    pub features: TierFeatures,
}

impl LodTier {
    /// Tier with the full-detail geometry hints (8 segments, 3 blades).
    pub const fn new(max_distance: f32, detail_ratio: f32) -> Self {
        Self {
            max_distance,
            detail_ratio,
            segments: 8,
            blades: 3,
            features: TierFeatures::empty(),
        }
    }

    const fn with_geometry(mut self, segments: u8, blades: u8, features: TierFeatures) -> Self {
        self.segments = segments;
        self.blades = blades;
        self.features = features;
        self
    }
}

const SKIP_ALL: TierFeatures = TierFeatures::SKIP_NACELLE
    .union(TierFeatures::SKIP_BLADES)
    .union(TierFeatures::BILLBOARD);

const STANDARD_TIERS: [LodTier; 3] = [
    LodTier::new(0.3, 1.0),
    LodTier::new(0.8, 0.5),
    LodTier::new(f32::INFINITY, 0.1),
];

const AGGRESSIVE_TIERS: [LodTier; 5] = [
    LodTier::new(0.15, 1.0).with_geometry(8, 3, TierFeatures::empty()),
    LodTier::new(0.35, 0.6).with_geometry(6, 3, TierFeatures::empty()),
    LodTier::new(0.55, 0.25).with_geometry(4, 3, TierFeatures::empty()),
    LodTier::new(0.85, 0.08).with_geometry(4, 1, TierFeatures::SKIP_NACELLE),
    LodTier::new(f32::INFINITY, 0.02).with_geometry(3, 0, SKIP_ALL),
];

const EXTREME_TIERS: [LodTier; 5] = [
    LodTier::new(0.10, 1.0).with_geometry(6, 3, TierFeatures::empty()),
    LodTier::new(0.25, 0.4).with_geometry(4, 2, TierFeatures::empty()),
    LodTier::new(0.45, 0.15).with_geometry(4, 1, TierFeatures::SKIP_NACELLE),
    LodTier::new(0.70, 0.05).with_geometry(
        3, 0, TierFeatures::SKIP_NACELLE.union(TierFeatures::SKIP_BLADES),
    ),
    LodTier::new(f32::INFINITY, 0.01).with_geometry(3, 0, SKIP_ALL),
];

/// Population above which the extreme tables are chosen.
pub const EXTREME_POPULATION: usize = 25_000;
/// Population above which the aggressive tables are chosen.
pub const AGGRESSIVE_POPULATION: usize = 10_000;

/// Built-in table selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LodMode {
    /// 3 tiers
    #[default]
    Standard,
    /// 5 tiers, earlier and steeper reduction
    Aggressive,
    /// 5 tiers for very large populations
    Extreme,
}

impl LodMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LodMode::Standard => "standard",
            LodMode::Aggressive => "aggressive",
            LodMode::Extreme => "extreme",
        }
    }

    /// Mode suited to an object population of `count`.
    pub fn for_population(count: usize) -> Self {
        if count > EXTREME_POPULATION {
            LodMode::Extreme
        } else if count > AGGRESSIVE_POPULATION {
            LodMode::Aggressive
        } else {
            LodMode::Standard
        }
    }
}

impl fmt::Display for LodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LodMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(LodMode::Standard),
            "aggressive" => Ok(LodMode::Aggressive),
            "extreme" => Ok(LodMode::Extreme),
            _ => Err(engine_err!(InvalidConfiguration, SOURCE,
                "unknown LOD mode '{}' (expected standard, aggressive or extreme)", s)),
        }
    }
}

/// Validated, immutable tier table.
#[derive(Debug, Clone, PartialEq)]
pub struct LodTable {
    tiers: Vec<LodTier>,
}

impl LodTable {
    /// Validate and wrap a tier list.
    ///
    /// # Errors
    ///
    /// `InvalidLodTable` unless:
    /// - there is at least one tier (and at most 255)
    /// - thresholds are positive, not NaN and strictly increasing
    ///   (only the last may be infinite)
    /// - detail ratios lie in [0, 1] and strictly decrease
    /// - segments >= 3 and blades <= 3
    pub fn new(tiers: Vec<LodTier>) -> Result<Self> {
        if tiers.is_empty() {
            engine_bail!(InvalidLodTable, SOURCE, "table has no tiers");
        }
        if tiers.len() > u8::MAX as usize {
            engine_bail!(InvalidLodTable, SOURCE, "{} tiers exceed the limit of {}", tiers.len(), u8::MAX);
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.max_distance.is_nan() || tier.max_distance <= 0.0 {
                engine_bail!(InvalidLodTable, SOURCE,
                    "tier {} threshold {} must be positive", i, tier.max_distance);
            }
            if tier.max_distance.is_infinite() && i + 1 != tiers.len() {
                engine_bail!(InvalidLodTable, SOURCE, "only the last tier may be unbounded (tier {})", i);
            }
            if !(0.0..=1.0).contains(&tier.detail_ratio) {
                engine_bail!(InvalidLodTable, SOURCE,
                    "tier {} detail ratio {} must lie in [0, 1]", i, tier.detail_ratio);
            }
            if tier.segments < 3 {
                engine_bail!(InvalidLodTable, SOURCE, "tier {} needs at least 3 segments", i);
            }
            if tier.blades > 3 {
                engine_bail!(InvalidLodTable, SOURCE, "tier {} has {} blades (max 3)", i, tier.blades);
            }
        }

        for (i, pair) in tiers.windows(2).enumerate() {
            if pair[1].max_distance <= pair[0].max_distance {
                engine_bail!(InvalidLodTable, SOURCE,
                    "thresholds must be strictly increasing ({} then {} at tier {})",
                    pair[0].max_distance, pair[1].max_distance, i + 1);
            }
            if pair[1].detail_ratio >= pair[0].detail_ratio {
                engine_bail!(InvalidLodTable, SOURCE,
                    "detail ratios must be strictly decreasing ({} then {} at tier {})",
                    pair[0].detail_ratio, pair[1].detail_ratio, i + 1);
            }
        }

        Ok(Self { tiers })
    }

    /// Table from `(threshold, detail_ratio)` pairs with default geometry hints.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(d, r)| LodTier::new(d, r)).collect())
    }

    /// 3-tier table: 100 % / 50 % / 10 %.
    pub fn standard() -> Self {
        Self { tiers: STANDARD_TIERS.to_vec() }
    }

    /// 5-tier table: 100 % / 60 % / 25 % / 8 % / 2 %.
    pub fn aggressive() -> Self {
        Self { tiers: AGGRESSIVE_TIERS.to_vec() }
    }

    /// 5-tier table: 100 % / 40 % / 15 % / 5 % / 1 %.
    pub fn extreme() -> Self {
        Self { tiers: EXTREME_TIERS.to_vec() }
    }

    pub fn for_mode(mode: LodMode) -> Self {
        match mode {
            LodMode::Standard => Self::standard(),
            LodMode::Aggressive => Self::aggressive(),
            LodMode::Extreme => Self::extreme(),
        }
    }

    pub fn tiers(&self) -> &[LodTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false: a validated table has at least one tier.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the coarsest tier.
    pub fn last_tier(&self) -> u8 {
        (self.tiers.len() - 1) as u8
    }

    /// Tier `index`, clamped to the last tier.
    pub fn tier(&self, index: u8) -> &LodTier {
        &self.tiers[(index as usize).min(self.tiers.len() - 1)]
    }

    /// Smallest tier whose threshold exceeds `distance`; the last tier beyond
    /// every threshold. Monotonic: a larger distance never yields a finer
    /// tier. NaN maps to the last tier.
    pub fn assign_tier(&self, distance: f32) -> u8 {
        if distance.is_nan() {
            return self.last_tier();
        }
        let index = self.tiers.partition_point(|t| distance >= t.max_distance);
        index.min(self.tiers.len() - 1) as u8
    }

    pub fn detail_ratio(&self, tier: u8) -> f32 {
        self.tier(tier).detail_ratio
    }

    /// Estimated polygon savings (1 − mean detail ratio) for a tier
    /// histogram. 0 for an empty histogram.
    pub fn estimated_savings(&self, histogram: &[usize]) -> f32 {
        let (count, detail) = histogram
            .iter()
            .enumerate()
            .fold((0usize, 0.0f64), |(count, detail), (tier, &n)| {
                (count + n, detail + n as f64 * self.detail_ratio(tier.min(255) as u8) as f64)
            });
        if count == 0 {
            return 0.0;
        }
        (1.0 - detail / count as f64) as f32
    }

    /// Human-readable listing of the tiers.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.tiers.len());
        for (i, tier) in self.tiers.iter().enumerate() {
            let mut features = Vec::new();
            if tier.features.contains(TierFeatures::SKIP_NACELLE) {
                features.push("no-nacelle");
            }
            if tier.features.contains(TierFeatures::SKIP_BLADES) {
                features.push("no-blades");
            }
            if tier.features.contains(TierFeatures::BILLBOARD) {
                features.push("billboard");
            }
            let features = if features.is_empty() {
                String::new()
            } else {
                format!(" [{}]", features.join(", "))
            };
            lines.push(format!(
                "LOD{}: {:5.1}% below {} (segments={}, blades={}){}",
                i, tier.detail_ratio * 100.0, tier.max_distance, tier.segments, tier.blades, features
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
#[path = "lod_table_tests.rs"]
mod tests;
