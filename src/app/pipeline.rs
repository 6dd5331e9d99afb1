//! The analysis pipeline shared by the `run` and `fit` subcommands.
//!
//! regimes -> fit + quality + D per regime -> impermeable limit -> plots
//!
//! Each regime is independent; a failure is recorded against its key and the
//! remaining regimes proceed unless the failure mode says to abort.

use std::path::Path;

use log::{error, info, warn};

use crate::data::{find_regime, regimes};
use crate::domain::{AnalysisConfig, FailureMode, LimitCoating, Regime, RegimeResult};
use crate::error::{AnalysisError, AppError};
use crate::fit::RegressionAnalyzer;
use crate::plot::{LimitSeries, PlotConfig, PlotSeries, combined_plot_path, plot, plot_combined, regime_plot_path};
use crate::report::LimitSummary;

/// A regime that could not be fitted.
#[derive(Debug, Clone)]
pub struct RegimeFailure {
    pub regime: String,
    pub error: AnalysisError,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub results: Vec<RegimeResult>,
    pub failures: Vec<RegimeFailure>,
    pub limit: Option<LimitSummary>,
    pub limit_curve: Vec<(f64, f64)>,
    /// Plot artifacts that could not be written. Never fatal.
    pub plot_errors: Vec<AnalysisError>,
}

impl RunOutput {
    /// `(key, reason)` pairs for reporting and export.
    pub fn failure_reasons(&self) -> Vec<(String, String)> {
        self.failures
            .iter()
            .map(|f| (f.regime.clone(), f.error.to_string()))
            .collect()
    }
}

/// Run the pipeline over the embedded dataset.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    run_analysis_with(config, &regimes())
}

/// Run the pipeline over an explicit set of regimes.
pub fn run_analysis_with(config: &AnalysisConfig, regimes: &[Regime]) -> Result<RunOutput, AppError> {
    config.constants.validate()?;
    if config.grid_points < 2 {
        return Err(AnalysisError::InvalidParameter(format!(
            "grid points must be >= 2, got {}",
            config.grid_points
        ))
        .into());
    }
    if find_regime(regimes, &config.limit_regime).is_none() {
        return Err(AnalysisError::UnknownRegime(config.limit_regime.clone()).into());
    }

    let analyzer = RegressionAnalyzer::new(config.constants, config.slope_policy);

    let mut results = Vec::with_capacity(regimes.len());
    let mut failures = Vec::new();
    for regime in regimes {
        match analyzer.analyze(regime) {
            Ok(result) => {
                info!(
                    "regime={} slope={:.6} intercept={:.3} r2={:.4} D={:.3e}",
                    regime.key,
                    result.line.slope,
                    result.line.intercept,
                    result.quality.r_squared,
                    result.diffusion.value()
                );
                results.push(result);
            }
            Err(err) => {
                error!("{err}");
                if config.failure_mode == FailureMode::Abort {
                    return Err(err.into());
                }
                failures.push(RegimeFailure {
                    regime: regime.key.clone(),
                    error: err,
                });
            }
        }
    }

    if results.is_empty() {
        return Err(AppError::new(
            3,
            format!("All {} regimes failed to fit; nothing to report.", regimes.len()),
        ));
    }

    let (limit, limit_curve) = match results.iter().find(|r| r.regime.key == config.limit_regime) {
        Some(reference) => {
            let (summary, curve) = impermeable_limit_for(&analyzer, reference, config)?;
            (Some(summary), curve)
        }
        None => {
            warn!(
                "limit regime '{}' failed to fit; skipping the impermeable-limit comparison",
                config.limit_regime
            );
            (None, Vec::new())
        }
    };

    let plot_errors = if config.plot {
        write_plots(config, &results, limit.as_ref(), &limit_curve)
    } else {
        Vec::new()
    };

    Ok(RunOutput {
        results,
        failures,
        limit,
        limit_curve,
        plot_errors,
    })
}

fn impermeable_limit_for(
    analyzer: &RegressionAnalyzer,
    reference: &RegimeResult,
    config: &AnalysisConfig,
) -> Result<(LimitSummary, Vec<(f64, f64)>), AnalysisError> {
    let coating_d = match config.limit_coating {
        LimitCoating::Impermeable => config.constants.d_pla_impermeable,
        LimitCoating::Extracted => reference.diffusion.value(),
    };
    let (h_min, h_max) = reference
        .regime
        .thickness_span()
        .ok_or_else(|| AnalysisError::InsufficientData {
            regime: reference.regime.key.clone(),
            samples: 0,
            distinct: 0,
        })?;

    let curve = analyzer.impermeable_limit_curve(h_min, h_max, config.grid_points, coating_d)?;
    let summary = LimitSummary {
        regime: reference.regime.key.clone(),
        d_pla: config.constants.d_pla_impermeable,
        coating_d,
        h_min,
        h_max,
        wvtr_at_min: analyzer.impermeable_limit(h_min, coating_d)?,
        wvtr_at_max: analyzer.impermeable_limit(h_max, coating_d)?,
    };
    Ok((summary, curve))
}

/// Render every figure; failures are logged and returned, never raised.
fn write_plots(
    config: &AnalysisConfig,
    results: &[RegimeResult],
    limit: Option<&LimitSummary>,
    limit_curve: &[(f64, f64)],
) -> Vec<AnalysisError> {
    let mut errors = Vec::new();
    if let Err(e) = std::fs::create_dir_all(&config.out_dir) {
        let err = AnalysisError::PlotWrite {
            path: config.out_dir.display().to_string(),
            message: e.to_string(),
        };
        warn!("{err}");
        errors.push(err);
        return errors;
    }

    for (idx, r) in results.iter().enumerate() {
        let path = regime_plot_path(&config.out_dir, &r.regime.key);
        let plot_config =
            PlotConfig::regime(&r.regime.label, r.quality.r_squared, idx).with_size(config.plot_width, config.plot_height);
        record(
            &mut errors,
            plot(&r.regime, &r.line, limit_overlay(limit, limit_curve, &r.regime.key), &path, &plot_config),
            &path,
        );
    }

    let series: Vec<PlotSeries<'_>> = results
        .iter()
        .map(|r| PlotSeries {
            regime: &r.regime,
            line: &r.line,
        })
        .collect();
    let path = combined_plot_path(&config.out_dir);
    let combined_config = PlotConfig::combined().with_size(config.plot_width, config.plot_height);
    let combined_limit = limit.and_then(|l| limit_overlay(Some(l), limit_curve, &l.regime));
    record(
        &mut errors,
        plot_combined(&series, combined_limit, &path, &combined_config),
        &path,
    );

    errors
}

/// The limit curve, when `key` is the regime it was computed for.
fn limit_overlay<'a>(limit: Option<&LimitSummary>, curve: &'a [(f64, f64)], key: &str) -> Option<LimitSeries<'a>> {
    limit.filter(|l| l.regime == key).map(|_| LimitSeries {
        label: "PLA impermeable",
        points: curve,
    })
}

fn record(errors: &mut Vec<AnalysisError>, outcome: Result<(), AnalysisError>, path: &Path) {
    match outcome {
        Ok(()) => info!("wrote {}", path.display()),
        Err(err) => {
            warn!("{err}");
            errors.push(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PhysicalConstants, Sample};

    fn config_in(dir: &Path) -> AnalysisConfig {
        AnalysisConfig {
            out_dir: dir.to_path_buf(),
            ..AnalysisConfig::default()
        }
    }

    fn flat_regime() -> Regime {
        Regime::new("flat", "Flat", vec![Sample::new(50.0, 5.0), Sample::new(60.0, 5.0)])
    }

    #[test]
    fn embedded_dataset_fits_every_regime() {
        let config = AnalysisConfig {
            plot: false,
            ..AnalysisConfig::default()
        };
        let run = run_analysis(&config).unwrap();

        assert_eq!(run.results.len(), 4);
        assert!(run.failures.is_empty());
        for r in &run.results {
            assert!(r.line.slope < 0.0, "{} slope {}", r.regime.key, r.line.slope);
            assert!(r.diffusion.value() > 0.0);
        }

        let limit = run.limit.unwrap();
        assert_eq!(limit.regime, "4x_pla");
        assert_eq!((limit.h_min, limit.h_max), (64.0, 83.0));
        assert!(limit.wvtr_at_max < limit.wvtr_at_min);
        assert_eq!(run.limit_curve.len(), 100);
    }

    #[test]
    fn continue_mode_keeps_healthy_regimes() {
        let mut regimes = regimes();
        regimes.insert(1, flat_regime());
        let config = AnalysisConfig {
            plot: false,
            ..AnalysisConfig::default()
        };

        let run = run_analysis_with(&config, &regimes).unwrap();
        assert_eq!(run.results.len(), 4);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].regime, "flat");
        assert!(matches!(run.failures[0].error, AnalysisError::DegenerateSlope { .. }));
    }

    #[test]
    fn abort_mode_stops_at_first_failure() {
        let mut regimes = regimes();
        regimes.insert(0, flat_regime());
        let config = AnalysisConfig {
            plot: false,
            failure_mode: FailureMode::Abort,
            ..AnalysisConfig::default()
        };

        let err = run_analysis_with(&config, &regimes).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("flat"));
    }

    #[test]
    fn all_regimes_failing_aborts() {
        let regimes = vec![flat_regime()];
        let config = AnalysisConfig {
            plot: false,
            limit_regime: "flat".to_string(),
            ..AnalysisConfig::default()
        };
        let err = run_analysis_with(&config, &regimes).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unknown_limit_regime_is_a_config_error() {
        let config = AnalysisConfig {
            plot: false,
            limit_regime: "nope".to_string(),
            ..AnalysisConfig::default()
        };
        assert_eq!(run_analysis(&config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn invalid_constants_are_rejected_before_fitting() {
        let config = AnalysisConfig {
            plot: false,
            constants: PhysicalConstants {
                ci: 0.1,
                ..PhysicalConstants::default()
            },
            ..AnalysisConfig::default()
        };
        assert_eq!(run_analysis(&config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn extracted_limit_coating_uses_fitted_coefficient() {
        let config = AnalysisConfig {
            plot: false,
            limit_coating: LimitCoating::Extracted,
            ..AnalysisConfig::default()
        };
        let run = run_analysis(&config).unwrap();
        let reference = run.results.iter().find(|r| r.regime.key == "4x_pla").unwrap();
        assert_eq!(run.limit.unwrap().coating_d, reference.diffusion.value());
    }

    #[test]
    fn writes_one_plot_per_regime_plus_combined() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_analysis(&config_in(tmp.path())).unwrap();

        assert!(run.plot_errors.is_empty(), "{:?}", run.plot_errors);
        for key in ["1x", "2x", "3x", "4x_pla"] {
            assert!(regime_plot_path(tmp.path(), key).exists(), "missing plot for {key}");
        }
        assert!(combined_plot_path(tmp.path()).exists());
    }

    #[test]
    fn plot_failures_do_not_discard_results() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let run = run_analysis(&config_in(&blocker)).unwrap();
        assert_eq!(run.results.len(), 4);
        assert!(!run.plot_errors.is_empty());
        assert!(matches!(run.plot_errors[0], AnalysisError::PlotWrite { .. }));
    }

    #[test]
    fn reruns_are_reproducible() {
        let a_dir = tempfile::tempdir().unwrap();
        let b_dir = tempfile::tempdir().unwrap();
        let a = run_analysis(&config_in(a_dir.path())).unwrap();
        let b = run_analysis(&config_in(b_dir.path())).unwrap();

        assert_eq!(a.results, b.results);
        assert_eq!(a.limit, b.limit);
        for key in ["1x", "4x_pla"] {
            let fa = std::fs::read(regime_plot_path(a_dir.path(), key)).unwrap();
            let fb = std::fs::read(regime_plot_path(b_dir.path(), key)).unwrap();
            assert_eq!(fa, fb);
        }
    }
}
