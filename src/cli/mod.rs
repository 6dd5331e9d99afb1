//! Command-line parsing for the WVTR regression tool.
//!
//! Argument parsing and dispatch stay separate from the fitting and plotting code.
//! Physical constants fall back to `WVTR_*` environment variables (a `.env` file
//! is loaded first) and then to the built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::LIMIT_REGIME;
use crate::domain::{
    CI_DEFAULT, CO_DEFAULT, D_PLA_IMPERMEABLE, FailureMode, HP_DEFAULT, LimitCoating, MW_WATER, SlopePolicy,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "wvtr",
    version,
    about = "WVTR vs coating thickness regression and diffusion-coefficient extraction"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit every regime, write plots, print the summary (the default).
    Run(RunArgs),
    /// Fit every regime and print the summary without plotting.
    Fit(RunArgs),
    /// Print the impermeable-PLA limit for one coating.
    Limit(LimitArgs),
}

/// Physical constants, shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ConstantsArgs {
    /// Molar mass of water (g/mol).
    #[arg(long, env = "WVTR_MW", default_value_t = MW_WATER)]
    pub mw: f64,

    /// Inner water vapor concentration (mol/m^3).
    #[arg(long, env = "WVTR_CI", default_value_t = CI_DEFAULT)]
    pub ci: f64,

    /// Outer water vapor concentration (mol/m^3).
    #[arg(long, env = "WVTR_CO", default_value_t = CO_DEFAULT)]
    pub co: f64,

    /// Paper thickness (m).
    #[arg(long, env = "WVTR_HP", default_value_t = HP_DEFAULT)]
    pub hp: f64,

    /// Diffusion coefficient of impermeable PLA (m^2/s).
    #[arg(long = "d-pla", env = "WVTR_D_PLA", default_value_t = D_PLA_IMPERMEABLE)]
    pub d_pla: f64,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub constants: ConstantsArgs,

    /// Directory for plot artifacts.
    #[arg(long, env = "WVTR_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip plot rendering.
    #[arg(long)]
    pub no_plot: bool,

    /// Continue past a failing regime, or abort on the first one.
    #[arg(long, value_enum, default_value_t = FailureMode::Continue)]
    pub failure_mode: FailureMode,

    /// How a positive fitted slope is treated.
    #[arg(long, value_enum, default_value_t = SlopePolicy::Reject)]
    pub slope_policy: SlopePolicy,

    /// Regime whose thickness span carries the impermeable-limit curve.
    #[arg(long, default_value = LIMIT_REGIME)]
    pub limit_regime: String,

    /// Coating coefficient used for the limit curve.
    #[arg(long, value_enum, default_value_t = LimitCoating::Impermeable)]
    pub limit_coating: LimitCoating,

    /// Points sampled along fitted lines and the limit curve.
    #[arg(long, default_value_t = 100)]
    pub grid_points: usize,

    /// Plot width (px).
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Plot height (px).
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Export all results to JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export per-regime results to CSV.
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct LimitArgs {
    #[command(flatten)]
    pub constants: ConstantsArgs,

    /// Coating thickness (um).
    #[arg(long)]
    pub thickness: f64,

    /// Coating diffusion coefficient (m^2/s); defaults to D_PLA.
    #[arg(long)]
    pub coating_d: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["wvtr", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.failure_mode, FailureMode::Continue);
        assert_eq!(args.slope_policy, SlopePolicy::Reject);
        assert_eq!(args.limit_regime, LIMIT_REGIME);
        assert_eq!(args.grid_points, 100);
        assert!(!args.no_plot);
    }

    #[test]
    fn limit_requires_thickness() {
        assert!(Cli::try_parse_from(["wvtr", "limit"]).is_err());
        let cli = Cli::try_parse_from(["wvtr", "limit", "--thickness", "80", "--coating-d", "1e-12"]).unwrap();
        let Command::Limit(args) = cli.command else {
            panic!("expected limit");
        };
        assert_eq!(args.thickness, 80.0);
        assert_eq!(args.coating_d, Some(1e-12));
    }

    #[test]
    fn value_enums_parse() {
        let cli = Cli::try_parse_from([
            "wvtr",
            "fit",
            "--failure-mode",
            "abort",
            "--slope-policy",
            "warn",
            "--limit-coating",
            "extracted",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.failure_mode, FailureMode::Abort);
        assert_eq!(args.slope_policy, SlopePolicy::Warn);
        assert_eq!(args.limit_coating, LimitCoating::Extracted);
    }
}
