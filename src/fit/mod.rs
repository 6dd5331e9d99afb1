//! Regression fitting and Fick's-law derivations.
//!
//! Responsibilities:
//!
//! - fit a straight WVTR-vs-thickness line per regime
//! - derive an effective diffusion coefficient from the slope
//! - evaluate the impermeable-PLA limit

pub mod analyzer;

pub use analyzer::*;
