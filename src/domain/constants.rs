//! Fixed physical constants for the Fick's-law algebra.
//!
//! The defaults are the thesis values. The struct is built once per run and
//! handed to the analyzer by value; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Molar mass of water, g/mol.
pub const MW_WATER: f64 = 18.01528;
/// Inner water vapor concentration, mol/m³.
pub const CI_DEFAULT: f64 = 1.1;
/// Outer water vapor concentration, mol/m³.
pub const CO_DEFAULT: f64 = 0.55;
/// Paper substrate thickness, m.
pub const HP_DEFAULT: f64 = 62.5e-6;
/// Diffusion coefficient assumed for impermeable PLA, m²/s.
pub const D_PLA_IMPERMEABLE: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// g/mol
    pub mw: f64,
    /// mol/m³
    pub ci: f64,
    /// mol/m³
    pub co: f64,
    /// Paper thickness, m.
    pub hp: f64,
    /// m²/s
    pub d_pla_impermeable: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            mw: MW_WATER,
            ci: CI_DEFAULT,
            co: CO_DEFAULT,
            hp: HP_DEFAULT,
            d_pla_impermeable: D_PLA_IMPERMEABLE,
        }
    }
}

impl PhysicalConstants {
    /// Build and validate a constant set.
    pub fn new(mw: f64, ci: f64, co: f64, hp: f64, d_pla_impermeable: f64) -> Result<Self, AnalysisError> {
        let c = Self {
            mw,
            ci,
            co,
            hp,
            d_pla_impermeable,
        };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let all = [self.mw, self.ci, self.co, self.hp, self.d_pla_impermeable];
        if !all.iter().all(|v| v.is_finite()) {
            return Err(AnalysisError::InvalidConstants(
                "all physical constants must be finite".to_string(),
            ));
        }
        if self.mw <= 0.0 {
            return Err(AnalysisError::InvalidConstants(format!("Mw must be > 0, got {}", self.mw)));
        }
        if self.ci <= self.co {
            return Err(AnalysisError::InvalidConstants(format!(
                "Ci must exceed Co (Ci={}, Co={})",
                self.ci, self.co
            )));
        }
        if self.hp <= 0.0 {
            return Err(AnalysisError::InvalidConstants(format!("Hp must be > 0, got {}", self.hp)));
        }
        if self.d_pla_impermeable <= 0.0 {
            return Err(AnalysisError::InvalidConstants(format!(
                "D_PLA must be > 0, got {}",
                self.d_pla_impermeable
            )));
        }
        Ok(())
    }

    /// Driving term `Mw·(Ci−Co)`, g/m³.
    pub fn driving_force(&self) -> f64 {
        self.mw * (self.ci - self.co)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PhysicalConstants::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_concentrations() {
        let err = PhysicalConstants::new(MW_WATER, 0.5, 0.55, HP_DEFAULT, D_PLA_IMPERMEABLE).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConstants(_)));
    }

    #[test]
    fn rejects_nan() {
        assert!(PhysicalConstants::new(f64::NAN, 1.1, 0.55, HP_DEFAULT, D_PLA_IMPERMEABLE).is_err());
    }

    #[test]
    fn driving_force_matches_defaults() {
        let c = PhysicalConstants::default();
        assert!((c.driving_force() - 18.01528 * 0.55).abs() < 1e-12);
    }
}
