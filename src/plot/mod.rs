//! Static SVG figures rendered with `plotters`.
//!
//! - `plot`: one regime, raw samples plus its fitted line
//! - `plot_combined`: every regime's fit plus the impermeable-PLA limit

pub mod config;
pub mod regression;

pub use config::{PlotConfig, series_color};
pub use regression::*;
