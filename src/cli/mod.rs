//! Command-line parsing.
//!
//! Argument parsing and command dispatch stay separate from the fitting and
//! integration code. Flags that have environment defaults are `Option`s here;
//! `app` resolves them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{MAX_POLYNOMIAL_ORDER, ModelSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fitint",
    version,
    about = "Least-squares curve fitting and Simpson integration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model family and print the fitted expression.
    Fit(FitArgs),
    /// Integrate an expression in x over [lower, upper].
    Integrate(IntegrateArgs),
    /// Fit, then integrate the fitted expression between two sample bounds.
    Run(RunArgs),
    /// Fit every family and rank them by R².
    Rank(RankArgs),
}

/// Where samples come from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV with `x` and `y` columns. Defaults to the built-in velocity/time data.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Model selection and output options shared by `fit` and `run`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Model family to fit.
    #[arg(long, value_enum)]
    pub model: ModelSpec,

    /// Polynomial order (only used with `--model polynomial`).
    #[arg(long, default_value_t = 2)]
    pub order: usize,

    /// Significant digits in the rendered expression [env: FITINT_PRECISION].
    #[arg(long)]
    pub precision: Option<usize>,

    /// Print the result as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot of samples and fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-sample residuals to CSV.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

/// Options for `integrate`.
#[derive(Debug, Args, Clone)]
pub struct IntegrateArgs {
    /// Expression in x, e.g. "0.5*x^2 + ln(x)".
    #[arg(long, value_name = "TEXT")]
    pub expr: String,

    /// Lower limit.
    #[arg(long, allow_negative_numbers = true)]
    pub lower: f64,

    /// Upper limit.
    #[arg(long, allow_negative_numbers = true)]
    pub upper: f64,

    /// Number of subdivisions, even and >= 2 [env: FITINT_SUBDIVISIONS].
    #[arg(long)]
    pub subdivisions: Option<usize>,
}

/// Options for `run`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub fit: FitArgs,

    /// Lower integration limit (must not precede the first sample).
    #[arg(long, allow_negative_numbers = true)]
    pub lower: f64,

    /// Upper integration limit (must not exceed the last sample).
    #[arg(long, allow_negative_numbers = true)]
    pub upper: f64,

    /// Number of subdivisions, even and >= 2 [env: FITINT_SUBDIVISIONS].
    #[arg(long)]
    pub subdivisions: Option<usize>,
}

/// Options for `rank`.
#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Highest polynomial order to include.
    #[arg(long, default_value_t = MAX_POLYNOMIAL_ORDER)]
    pub max_order: usize,

    /// Significant digits in the rendered expressions [env: FITINT_PRECISION].
    #[arg(long)]
    pub precision: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fitint").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn fit_defaults() {
        let cli = parse(&["fit", "--model", "polynomial"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.model, ModelSpec::Polynomial);
        assert_eq!(args.order, 2);
        assert_eq!(args.precision, None);
        assert!(args.data.csv.is_none());
        assert!(!args.json && !args.plot);
    }

    #[test]
    fn run_accepts_negative_bounds() {
        let cli = parse(&[
            "run", "--model", "linear", "--lower", "-1.5", "--upper", "2", "--subdivisions", "20",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.lower, -1.5);
        assert_eq!(args.upper, 2.0);
        assert_eq!(args.subdivisions, Some(20));
        assert_eq!(args.fit.model, ModelSpec::Linear);
    }

    #[test]
    fn integrate_requires_expression() {
        let res = Cli::try_parse_from(["fitint", "integrate", "--lower", "0", "--upper", "1"]);
        assert!(res.is_err());
    }

    #[test]
    fn rank_defaults_to_max_order() {
        let cli = parse(&["rank", "--csv", "data.csv"]);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.max_order, MAX_POLYNOMIAL_ORDER);
        assert_eq!(args.data.csv, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(Cli::try_parse_from(["fitint", "fit", "--model", "spline"]).is_err());
    }
}
