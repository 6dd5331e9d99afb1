//! Export per-regime results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or to feed the
//! extracted coefficients into a downstream diffusion model.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::RegimeResult;
use crate::error::AppError;

/// Write one row per regime.
pub fn write_results_csv(path: &Path, results: &[RegimeResult]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(
        file,
        "regime,label,n,h_min_um,h_max_um,slope_per_um,intercept,r_squared,rmse,d_m2_per_s"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in results {
        let (h_min, h_max) = r.regime.thickness_span().unwrap_or((f64::NAN, f64::NAN));
        writeln!(
            file,
            "{},\"{}\",{},{:.3},{:.3},{:.10},{:.6},{:.6},{:.6},{:.6e}",
            r.regime.key,
            r.regime.label.replace('"', "\"\""),
            r.quality.n,
            h_min,
            h_max,
            r.line.slope,
            r.line.intercept,
            r.quality.r_squared,
            r.quality.rmse,
            r.diffusion.value(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
