//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the regression pipeline
//! - prints the summary and reports plot failures
//! - writes optional exports
//! - maps regime failures to a non-zero exit code

use clap::Parser;

use crate::cli::{Command, ConstantsArgs, LimitArgs, RunArgs};
use crate::domain::{AnalysisConfig, PhysicalConstants, SlopePolicy};
use crate::error::AppError;
use crate::fit::RegressionAnalyzer;
use crate::io::{ResultsFile, write_results_csv, write_results_json};

pub mod pipeline;

/// Entry point for the `wvtr` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` values feed clap's `env` fallbacks, so load it before parsing.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, true),
        Command::Fit(args) => handle_run(args, false),
        Command::Limit(args) => handle_limit(args),
    }
}

fn handle_run(args: RunArgs, plot: bool) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args, plot)?;
    let run = pipeline::run_analysis(&config)?;
    let failures = run.failure_reasons();

    println!(
        "{}",
        crate::report::format_run_summary(&config.constants, &run.results, &failures, run.limit.as_ref())
    );

    for err in &run.plot_errors {
        eprintln!("warning: {err}");
    }

    if let Some(path) = &config.export_json {
        let file = ResultsFile::new(config.constants, run.results.clone(), failures.clone());
        write_results_json(path, &file)?;
    }
    if let Some(path) = &config.export_csv {
        write_results_csv(path, &run.results)?;
    }

    if !failures.is_empty() {
        return Err(AppError::new(
            3,
            format!(
                "{} of {} regimes failed: {}",
                failures.len(),
                failures.len() + run.results.len(),
                failures
                    .iter()
                    .map(|(key, _)| key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }

    Ok(())
}

fn handle_limit(args: LimitArgs) -> Result<(), AppError> {
    let constants = constants_from_args(&args.constants)?;
    let analyzer = RegressionAnalyzer::new(constants, SlopePolicy::Reject);
    let coating_d = args.coating_d.unwrap_or(constants.d_pla_impermeable);
    let wvtr = analyzer.impermeable_limit(args.thickness, coating_d)?;

    println!(
        "Impermeable limit: H={:.1}um Dc={:.2e} m^2/s D_PLA={:.2e} m^2/s WVTR={:.3e}",
        args.thickness, coating_d, constants.d_pla_impermeable, wvtr
    );
    Ok(())
}

pub fn constants_from_args(args: &ConstantsArgs) -> Result<PhysicalConstants, AppError> {
    Ok(PhysicalConstants::new(args.mw, args.ci, args.co, args.hp, args.d_pla)?)
}

pub fn analysis_config_from_args(args: &RunArgs, plot: bool) -> Result<AnalysisConfig, AppError> {
    Ok(AnalysisConfig {
        constants: constants_from_args(&args.constants)?,
        slope_policy: args.slope_policy,
        failure_mode: args.failure_mode,
        limit_regime: args.limit_regime.clone(),
        limit_coating: args.limit_coating,
        grid_points: args.grid_points,
        plot: plot && !args.no_plot,
        out_dir: args.out_dir.clone(),
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
    })
}

/// Rewrite argv so `wvtr` defaults to `wvtr run`.
///
/// Rules:
/// - `wvtr`                       -> `wvtr run`
/// - `wvtr --out-dir plots ...`   -> `wvtr run --out-dir plots ...`
/// - `wvtr --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fit" | "limit");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["wvtr"])), argv(&["wvtr", "run"]));
    }

    #[test]
    fn leading_flags_go_to_run() {
        assert_eq!(
            rewrite_args(argv(&["wvtr", "--no-plot"])),
            argv(&["wvtr", "run", "--no-plot"])
        );
        assert_eq!(rewrite_args(argv(&["wvtr", "--help"])), argv(&["wvtr", "--help"]));
        assert_eq!(rewrite_args(argv(&["wvtr", "fit"])), argv(&["wvtr", "fit"]));
    }

    #[test]
    fn fit_subcommand_never_plots() {
        let cli = Cli::try_parse_from(["wvtr", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = analysis_config_from_args(&args, false).unwrap();
        assert!(!config.plot);
    }

    #[test]
    fn invalid_constants_map_to_exit_code_2() {
        let cli = Cli::try_parse_from(["wvtr", "run", "--ci", "0.1"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(analysis_config_from_args(&args, true).unwrap_err().exit_code(), 2);
    }
}
