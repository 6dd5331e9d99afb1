//! Formatted terminal output.
//!
//! Number formats are fixed so repeated runs print identical text:
//! slope `{:.6}`, intercept `{:.3}`, D `{:.3e}`, limit WVTR `{:.3e}`.

use crate::domain::{PhysicalConstants, RegimeResult};

/// Impermeable-limit comparison printed after the per-regime lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitSummary {
    pub regime: String,
    pub d_pla: f64,
    /// Coating coefficient used for the curve, m²/s.
    pub coating_d: f64,
    pub h_min: f64,
    pub h_max: f64,
    /// Limit WVTR at `h_min` and `h_max`.
    pub wvtr_at_min: f64,
    pub wvtr_at_max: f64,
}

/// `Regime=<key> slope=<m> intercept=<b> D=<value> m^2/s`
pub fn format_regime_line(result: &RegimeResult) -> String {
    format!(
        "Regime={} slope={:.6} intercept={:.3} D={:.3e} m^2/s",
        result.regime.key,
        result.line.slope,
        result.line.intercept,
        result.diffusion.value(),
    )
}

pub fn format_limit_line(limit: &LimitSummary) -> String {
    format!(
        "Impermeable limit: regime={} D_PLA={:.2e} m^2/s Dc={:.2e} m^2/s H=[{:.1}, {:.1}]um WVTR=[{:.3e}, {:.3e}]",
        limit.regime, limit.d_pla, limit.coating_d, limit.h_min, limit.h_max, limit.wvtr_at_min, limit.wvtr_at_max,
    )
}

/// Full run summary: header, constants, one line per regime, fit diagnostics, limit.
pub fn format_run_summary(
    constants: &PhysicalConstants,
    results: &[RegimeResult],
    failures: &[(String, String)],
    limit: Option<&LimitSummary>,
) -> String {
    let mut out = String::new();

    out.push_str("=== wvtr - WVTR regression / diffusion extraction ===\n");
    out.push_str(&format!(
        "Constants: Mw={} g/mol Ci={} mol/m^3 Co={} mol/m^3 Hp={:.3e} m D_PLA,imperm={:.2e} m^2/s\n\n",
        constants.mw, constants.ci, constants.co, constants.hp, constants.d_pla_impermeable
    ));

    for r in results {
        out.push_str(&format_regime_line(r));
        out.push('\n');
    }
    for (key, reason) in failures {
        out.push_str(&format!("Regime={key} FAILED: {reason}\n"));
    }

    if !results.is_empty() {
        out.push_str("\nFit diagnostics:\n");
        for r in results {
            out.push_str(&format!(
                "  {:<24} n={} R^2={:.4} RMSE={:.3}\n",
                r.regime.label, r.quality.n, r.quality.r_squared, r.quality.rmse
            ));
        }
    }

    if let Some(limit) = limit {
        out.push('\n');
        out.push_str(&format_limit_line(limit));
        out.push('\n');
    }

    out
}
