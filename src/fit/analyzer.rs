//! The regression analyzer.
//!
//! Thickness enters the fit in µm (as recorded) and is converted to metres only
//! where Fick's law needs it:
//!
//! ```text
//! D      = Mw·(Ci−Co) / |m|                      m in g/(m²·day·m)
//! WVTR_∞ = Mw·(Ci−Co) / (Hp/D_PLA + Hc/Dc)       series resistance, PLA impermeable
//! ```

use log::{debug, warn};

use crate::domain::{
    DiffusionCoefficient, FitQuality, Line, PhysicalConstants, Regime, RegimeResult, SlopePolicy, UM_PER_M,
    linspace,
};
use crate::error::AnalysisError;
use crate::math::{distinct_count, fit_line, line_fit_stats};

#[derive(Debug, Clone)]
pub struct RegressionAnalyzer {
    constants: PhysicalConstants,
    slope_policy: SlopePolicy,
}

impl RegressionAnalyzer {
    pub fn new(constants: PhysicalConstants, slope_policy: SlopePolicy) -> Self {
        Self {
            constants,
            slope_policy,
        }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Least-squares line through the regime's samples.
    pub fn fit(&self, regime: &Regime) -> Result<Line, AnalysisError> {
        let (xs, ys) = columns(regime);

        let distinct = distinct_count(&xs);
        if xs.len() < 2 || distinct < 2 {
            return Err(AnalysisError::InsufficientData {
                regime: regime.key.clone(),
                samples: xs.len(),
                distinct,
            });
        }
        if !xs.iter().chain(&ys).all(|v| v.is_finite()) {
            return Err(AnalysisError::NonFinite(format!(
                "regime '{}' contains non-finite samples",
                regime.key
            )));
        }

        let (slope, intercept) = fit_line(&xs, &ys)
            .ok_or_else(|| AnalysisError::NonFinite(format!("least squares failed for regime '{}'", regime.key)))?;
        debug!("regime={} slope={slope} intercept={intercept}", regime.key);

        Ok(Line { slope, intercept })
    }

    /// [`fit`](Self::fit) plus R² and RMSE.
    pub fn fit_with_quality(&self, regime: &Regime) -> Result<(Line, FitQuality), AnalysisError> {
        let line = self.fit(regime)?;
        let (xs, ys) = columns(regime);
        let (r_squared, rmse) = line_fit_stats(&xs, &ys, line.slope, line.intercept);
        Ok((
            line,
            FitQuality {
                n: xs.len(),
                r_squared,
                rmse,
            },
        ))
    }

    /// `D = Mw·(Ci−Co)/|m|`, with `m` taken per metre of thickness.
    pub fn diffusion_coefficient(&self, line: &Line) -> Result<DiffusionCoefficient, AnalysisError> {
        self.diffusion_for("<line>", line)
    }

    fn diffusion_for(&self, regime: &str, line: &Line) -> Result<DiffusionCoefficient, AnalysisError> {
        let m = line.slope;
        if !m.is_finite() {
            return Err(AnalysisError::NonFinite(format!("slope for regime '{regime}' is {m}")));
        }
        if m == 0.0 {
            return Err(AnalysisError::DegenerateSlope {
                regime: regime.to_string(),
                slope: m,
            });
        }
        if m > 0.0 {
            match self.slope_policy {
                SlopePolicy::Reject => {
                    return Err(AnalysisError::DegenerateSlope {
                        regime: regime.to_string(),
                        slope: m,
                    });
                }
                SlopePolicy::Warn => {
                    warn!("regime '{regime}' has positive slope {m:e}; using |m| for D");
                }
            }
        }

        let d = self.constants.driving_force() / line.slope_per_metre().abs();
        if !d.is_finite() {
            return Err(AnalysisError::NonFinite(format!("diffusion coefficient for regime '{regime}'")));
        }
        Ok(DiffusionCoefficient(d))
    }

    /// Theoretical WVTR through paper + coating when the PLA layer is impermeable.
    ///
    /// `hc_um` is the coating thickness in µm; `dc` is the coating's coefficient
    /// in m²/s and may be `+∞` (coating offers no resistance).
    pub fn impermeable_limit(&self, hc_um: f64, dc: f64) -> Result<f64, AnalysisError> {
        if !(hc_um.is_finite() && hc_um >= 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "coating thickness must be finite and >= 0, got {hc_um}"
            )));
        }
        if dc.is_nan() || dc <= 0.0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "coating diffusion coefficient must be > 0, got {dc}"
            )));
        }
        let c = &self.constants;
        let resistance = c.hp / c.d_pla_impermeable + (hc_um / UM_PER_M) / dc;
        Ok(c.driving_force() / resistance)
    }

    /// Impermeable limit sampled at `n` thicknesses over `[h_min, h_max]` µm.
    pub fn impermeable_limit_curve(
        &self,
        h_min: f64,
        h_max: f64,
        n: usize,
        dc: f64,
    ) -> Result<Vec<(f64, f64)>, AnalysisError> {
        linspace(h_min, h_max, n)
            .into_iter()
            .map(|h| self.impermeable_limit(h, dc).map(|w| (h, w)))
            .collect()
    }

    /// Fit, score, and derive D for one regime.
    pub fn analyze(&self, regime: &Regime) -> Result<RegimeResult, AnalysisError> {
        let (line, quality) = self.fit_with_quality(regime)?;
        let diffusion = self.diffusion_for(&regime.key, &line)?;
        Ok(RegimeResult {
            regime: regime.clone(),
            line,
            quality,
            diffusion,
        })
    }
}

fn columns(regime: &Regime) -> (Vec<f64>, Vec<f64>) {
    regime.samples.iter().map(|s| (s.thickness_um, s.wvtr)).unzip()
}
