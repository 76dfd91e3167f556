//! LOD module: tier tables and the per-object tier selector.

pub mod lod_selector;
pub mod lod_table;

pub use lod_selector::{LodMetric, LodSelector};
pub use lod_table::{LodMode, LodTable, LodTier, TierFeatures};
