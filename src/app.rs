//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real entry point:
//! - installs the log subscriber
//! - parses CLI arguments and resolves environment defaults
//! - runs the fit / integrate / rank workflows
//! - prints reports, plots and JSON, and writes optional exports

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, FitArgs, IntegrateArgs, RankArgs, RunArgs};
use crate::config::{EnvDefaults, check_precision};
use crate::domain::{Bounds, FitOptions, MAX_POLYNOMIAL_ORDER, MIN_POLYNOMIAL_ORDER, ModelFamily, RunConfig};
use crate::error::AppError;
use crate::integrate::integrate_expr;

pub mod pipeline;

/// Entry point for the `fitint` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = Cli::parse();
    let defaults = EnvDefaults::from_env()?;
    debug!(?defaults, "environment defaults");

    match cli.command {
        Command::Fit(args) => {
            let config = run_config_from_fit_args(&args, None, &defaults)?;
            handle_fit(&config)
        }
        Command::Run(args) => {
            let config = run_config_from_run_args(&args, &defaults)?;
            handle_fit(&config)
        }
        Command::Integrate(args) => handle_integrate(&args, &defaults),
        Command::Rank(args) => handle_rank(&args, &defaults),
    }
}

/// Log to stderr so stdout stays the report. `RUST_LOG` overrides the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(config: &RunConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(config)?;

    if config.json {
        println!("{}", crate::io::fit_to_json(&run.model, run.integral)?);
    } else {
        print!(
            "{}",
            crate::report::format_fit_summary(&run.data.label, &run.data.stats, &run.data.row_errors, &run.model)
        );
        if let Some(integral) = &run.integral {
            print!("{}", crate::report::format_integral(integral));
        }
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&run.data.samples, &run.model, config.plot_width, config.plot_height);
        println!("\n{plot}");
    }

    if let Some(path) = &config.export_residuals {
        crate::io::write_residuals_csv(path, &run.model.residuals(&run.data.samples))?;
        debug!(path = %path.display(), "residuals exported");
    }

    Ok(())
}

fn handle_integrate(args: &IntegrateArgs, defaults: &EnvDefaults) -> Result<(), AppError> {
    let subdivisions = args.subdivisions.unwrap_or(defaults.subdivisions);
    let value = integrate_expr(&args.expr, args.lower, args.upper, subdivisions)?;
    println!("{value}");
    Ok(())
}

fn handle_rank(args: &RankArgs, defaults: &EnvDefaults) -> Result<(), AppError> {
    check_order(args.max_order)?;
    let fit_options = FitOptions {
        significant_digits: resolve_precision(args.precision, defaults)?,
    };

    let (data, ranking) = pipeline::run_rank(args.data.csv.as_deref(), args.max_order, &fit_options)?;
    print!("{}", crate::report::format_ranking(&data.label, &data.stats, &ranking));
    Ok(())
}

/// Resolve `fit` flags (plus optional integration settings) into a `RunConfig`.
pub fn run_config_from_fit_args(
    args: &FitArgs,
    integration: Option<(Bounds, Option<usize>)>,
    defaults: &EnvDefaults,
) -> Result<RunConfig, AppError> {
    let family = args.model.to_family(args.order);
    if let ModelFamily::Polynomial(order) = family {
        check_order(order)?;
    }

    let (bounds, subdivisions) = match integration {
        Some((bounds, flag)) => (Some(bounds), flag.unwrap_or(defaults.subdivisions)),
        None => (None, defaults.subdivisions),
    };

    Ok(RunConfig {
        csv_path: args.data.csv.clone(),
        family,
        fit_options: FitOptions {
            significant_digits: resolve_precision(args.precision, defaults)?,
        },
        bounds,
        subdivisions,
        json: args.json,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_residuals: args.export.clone(),
    })
}

pub fn run_config_from_run_args(args: &RunArgs, defaults: &EnvDefaults) -> Result<RunConfig, AppError> {
    let bounds = Bounds {
        lower: args.lower,
        upper: args.upper,
    };
    run_config_from_fit_args(&args.fit, Some((bounds, args.subdivisions)), defaults)
}

fn check_order(order: usize) -> Result<(), AppError> {
    if (MIN_POLYNOMIAL_ORDER..=MAX_POLYNOMIAL_ORDER).contains(&order) {
        Ok(())
    } else {
        Err(AppError::input(format!(
            "Polynomial order must be between {MIN_POLYNOMIAL_ORDER} and {MAX_POLYNOMIAL_ORDER}, got {order}."
        )))
    }
}

fn resolve_precision(flag: Option<usize>, defaults: &EnvDefaults) -> Result<usize, AppError> {
    match flag {
        Some(d) => check_precision(d).map_err(|msg| AppError::input(format!("Invalid --precision: {msg}"))),
        None => Ok(defaults.significant_digits),
    }
}
