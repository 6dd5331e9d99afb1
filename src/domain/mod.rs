//! Domain types used throughout the pipeline.
//!
//! - measurements and groupings (`Sample`, `Regime`)
//! - fit outputs (`Line`, `FitQuality`, `DiffusionCoefficient`, `RegimeResult`)
//! - run configuration (`PhysicalConstants`, `AnalysisConfig`, policy enums)

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
