//! Read/write the run results as JSON.
//!
//! The file carries the constants the run used, so coefficients can be
//! reproduced or compared across constant sets.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{PhysicalConstants, RegimeResult};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub tool: String,
    pub constants: PhysicalConstants,
    pub regimes: Vec<RegimeResult>,
    /// `(regime key, reason)` for regimes that could not be fitted.
    #[serde(default)]
    pub failures: Vec<(String, String)>,
}

impl ResultsFile {
    pub fn new(constants: PhysicalConstants, regimes: Vec<RegimeResult>, failures: Vec<(String, String)>) -> Self {
        Self {
            tool: "wvtr".to_string(),
            constants,
            regimes,
            failures,
        }
    }
}

pub fn write_results_json(path: &Path, results: &ResultsFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, results)
        .map_err(|e| AppError::new(2, format!("Failed to write results JSON: {e}")))?;
    Ok(())
}

pub fn read_results_json(path: &Path) -> Result<ResultsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid results JSON: {e}")))
}
