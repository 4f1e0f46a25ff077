//! Shared workflow behind the `fit`, `run` and `rank` commands:
//! load samples -> fit -> (optionally) validate bounds and integrate.
//!
//! The command handlers in `app` only deal with presentation.

use std::path::Path;

use tracing::{debug, info};

use crate::data::{REFERENCE_LABEL, reference_samples};
use crate::domain::{Bounds, DatasetStats, FitOptions, FittedModel, IntegralResult, RunConfig, SamplePair};
use crate::error::AppError;
use crate::fit::{FamilyRanking, fit_with_options, rank_families};
use crate::integrate::integrate_expr;
use crate::io::{RowError, load_samples};

/// Samples ready for fitting, with where they came from.
#[derive(Debug, Clone)]
pub struct SampleSet {
    pub label: String,
    pub samples: Vec<SamplePair>,
    pub row_errors: Vec<RowError>,
    pub stats: DatasetStats,
}

/// All computed outputs of a single `fit` / `run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub data: SampleSet,
    pub model: FittedModel,
    pub integral: Option<IntegralResult>,
}

/// Load samples from a CSV, or the built-in dataset when no path is given.
pub fn load_sample_set(csv_path: Option<&Path>) -> Result<SampleSet, AppError> {
    let (label, samples, row_errors) = match csv_path {
        Some(path) => {
            let ingest = load_samples(path)?;
            (path.display().to_string(), ingest.samples, ingest.row_errors)
        }
        None => (REFERENCE_LABEL.to_string(), reference_samples(), Vec::new()),
    };

    let stats = DatasetStats::from_samples(&samples)
        .ok_or_else(|| AppError::input("No samples to fit."))?;
    info!(source = %label, n = stats.n_points, "samples loaded");

    Ok(SampleSet {
        label,
        samples,
        row_errors,
        stats,
    })
}

/// Execute the fit (and the integral, if bounds are configured).
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let data = load_sample_set(config.csv_path.as_deref())?;
    run_fit_on(config, data)
}

/// Same as `run_fit` with samples already loaded.
pub fn run_fit_on(config: &RunConfig, data: SampleSet) -> Result<RunOutput, AppError> {
    let model = fit_with_options(&data.samples, config.family, &config.fit_options)?;
    info!(family = %model.family, r_squared = model.quality.r_squared, "fit complete");
    debug!(expression = %model.expression, coefficients = ?model.coefficients);

    let integral = match config.bounds {
        Some(bounds) => Some(integrate_model(&model, &data.stats, bounds, config.subdivisions)?),
        None => None,
    };

    Ok(RunOutput { data, model, integral })
}

/// Integrate the model's rendered expression after checking the bounds
/// against the sample range.
pub fn integrate_model(
    model: &FittedModel,
    stats: &DatasetStats,
    bounds: Bounds,
    subdivisions: usize,
) -> Result<IntegralResult, AppError> {
    validate_bounds(stats, bounds)?;

    let value = integrate_expr(&model.expression, bounds.lower, bounds.upper, subdivisions)?;
    info!(lower = bounds.lower, upper = bounds.upper, subdivisions, value, "integral complete");

    Ok(IntegralResult {
        lower: bounds.lower,
        upper: bounds.upper,
        subdivisions,
        value,
    })
}

/// Check integration bounds against the first and last sample x.
///
/// Every violation is reported in the one error.
pub fn validate_bounds(stats: &DatasetStats, bounds: Bounds) -> Result<(), AppError> {
    let Bounds { lower, upper } = bounds;
    let mut problems = Vec::new();

    if !lower.is_finite() || !upper.is_finite() {
        return Err(AppError::input(format!(
            "Integration limits must be finite (lower={lower}, upper={upper})."
        )));
    }
    if lower < stats.x_first {
        problems.push(format!(
            "lower limit {lower} is before the first sample x ({})",
            stats.x_first
        ));
    }
    if upper > stats.x_last {
        problems.push(format!(
            "upper limit {upper} is after the last sample x ({})",
            stats.x_last
        ));
    }
    if lower > upper {
        problems.push(format!("lower limit {lower} is greater than upper limit {upper}"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::input(format!("Invalid integration limits: {}.", problems.join("; "))))
    }
}

/// Fit and rank every family.
pub fn run_rank(csv_path: Option<&Path>, max_order: usize, opts: &FitOptions) -> Result<(SampleSet, FamilyRanking), AppError> {
    let data = load_sample_set(csv_path)?;
    let ranking = rank_families(&data.samples, max_order, opts);
    info!(ranked = ranking.ranked.len(), skipped = ranking.skipped.len(), "ranking complete");
    Ok((data, ranking))
}
