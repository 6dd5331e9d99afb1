//! Shared domain types.
//!
//! These types are plain values: created once per run, never shared mutably,
//! and serializable so they can be exported alongside the console summary.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Micrometres per metre. Samples are recorded in µm; Fick's-law algebra runs in SI.
pub const UM_PER_M: f64 = 1e6;

/// A single measurement: coating thickness and the WVTR observed through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Coating thickness (µm).
    pub thickness_um: f64,
    /// Water vapor transmission rate, g/(m²·day).
    pub wvtr: f64,
}

impl Sample {
    pub const fn new(thickness_um: f64, wvtr: f64) -> Self {
        Self { thickness_um, wvtr }
    }

    /// Thickness in metres.
    pub fn thickness_m(&self) -> f64 {
        self.thickness_um / UM_PER_M
    }
}

/// A named group of samples sharing one coating build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    /// Short identifier, safe for filenames (`1x`, `4x_pla`).
    pub key: String,
    /// Display label used in plot titles and legends.
    pub label: String,
    pub samples: Vec<Sample>,
}

impl Regime {
    pub fn new(key: impl Into<String>, label: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            samples,
        }
    }

    /// `(min, max)` thickness in µm, or `None` for an empty regime.
    pub fn thickness_span(&self) -> Option<(f64, f64)> {
        let mut it = self.samples.iter().map(|s| s.thickness_um);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), h| (lo.min(h), hi.max(h))))
    }

    /// `(min, max)` WVTR over the samples.
    pub fn wvtr_span(&self) -> Option<(f64, f64)> {
        let mut it = self.samples.iter().map(|s| s.wvtr);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

/// A fitted straight line `WVTR = slope · H + intercept`, with `H` in µm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// g/(m²·day·µm). Physically meaningful only when negative.
    pub slope: f64,
    /// g/(m²·day).
    pub intercept: f64,
}

impl Line {
    pub fn predict(&self, thickness_um: f64) -> f64 {
        self.slope * thickness_um + self.intercept
    }

    /// Slope against thickness in metres, g/(m²·day·m).
    pub fn slope_per_metre(&self) -> f64 {
        self.slope * UM_PER_M
    }

    /// Sample the line at `n` evenly spaced thicknesses over `[h_min, h_max]`.
    pub fn sample(&self, h_min: f64, h_max: f64, n: usize) -> Vec<(f64, f64)> {
        linspace(h_min, h_max, n)
            .into_iter()
            .map(|h| (h, self.predict(h)))
            .collect()
    }
}

/// Goodness-of-fit diagnostics for a [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub r_squared: f64,
    pub rmse: f64,
}

/// Effective diffusion coefficient derived from a fitted slope, m²/s.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffusionCoefficient(pub f64);

impl DiffusionCoefficient {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Everything computed for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: Regime,
    pub line: Line,
    pub quality: FitQuality,
    pub diffusion: DiffusionCoefficient,
}

/// What to do when a regime's fitted slope is positive.
///
/// A zero slope is always rejected: the coefficient would be infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SlopePolicy {
    /// Fail the regime with a degenerate-slope error.
    Reject,
    /// Log a warning and derive D from `|m|`.
    Warn,
}

/// How a failing regime affects the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Report the failure, finish the other regimes, exit non-zero at the end.
    Continue,
    /// Stop at the first failing regime.
    Abort,
}

/// Which coating coefficient feeds the impermeable-limit curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LimitCoating {
    /// Treat the coating like the PLA layer (`Dc = D_PLA,imperm`).
    Impermeable,
    /// Use the coefficient extracted from the limit regime's fit.
    Extracted,
}

/// Run configuration, resolved from CLI args and environment.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub constants: super::PhysicalConstants,
    pub slope_policy: SlopePolicy,
    pub failure_mode: FailureMode,
    pub limit_regime: String,
    pub limit_coating: LimitCoating,
    pub grid_points: usize,

    pub plot: bool,
    pub out_dir: PathBuf,
    pub plot_width: u32,
    pub plot_height: u32,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            constants: super::PhysicalConstants::default(),
            slope_policy: SlopePolicy::Reject,
            failure_mode: FailureMode::Continue,
            limit_regime: crate::data::LIMIT_REGIME.to_string(),
            limit_coating: LimitCoating::Impermeable,
            grid_points: 100,
            plot: true,
            out_dir: PathBuf::from("."),
            plot_width: 1000,
            plot_height: 700,
            export_json: None,
            export_csv: None,
        }
    }
}

/// `n` evenly spaced values over `[a, b]`, endpoints included.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| a + (b - a) * i as f64 / (n as f64 - 1.0))
        .collect()
}
