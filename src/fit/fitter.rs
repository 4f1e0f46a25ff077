//! Curve fitting for a single model family.
//!
//! Given samples `(x_i, y_i)` and a family, we:
//! - validate the input (order, point count, finiteness, log domains)
//! - build the design matrix on the linearized problem
//! - solve the least squares system
//! - map the solution back to model coefficients
//! - score the model on the original scale and render its expression

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitOptions, FittedModel, ModelFamily, SamplePair};
use crate::error::FitError;
use crate::math::{LeastSquaresError, fit_quality, solve_least_squares};
use crate::models::{coefficients_from_regression, fill_design_row, linearized_response, predict, render_expression};

/// Fit `family` to `samples` with default options.
pub fn fit(samples: &[SamplePair], family: ModelFamily) -> Result<FittedModel, FitError> {
    fit_with_options(samples, family, &FitOptions::default())
}

/// Fit `family` to `samples`.
///
/// Sample order does not matter. The function is pure.
pub fn fit_with_options(
    samples: &[SamplePair],
    family: ModelFamily,
    opts: &FitOptions,
) -> Result<FittedModel, FitError> {
    validate(samples, family)?;

    let p = family.param_count();
    let n = samples.len();

    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; p];

    for (i, s) in samples.iter().enumerate() {
        fill_design_row(family, s.x, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
        y[i] = linearized_response(family, s.y);
    }

    let beta = solve_least_squares(&x, &y).map_err(|e| match e {
        LeastSquaresError::RankDeficient { rank, columns } => FitError::SingularSystem { rank, columns },
    })?;
    let coefficients = coefficients_from_regression(family, beta.as_slice());
    // exp() of a large log-scale intercept overflows for exponential/power.
    if let Some((index, &value)) = coefficients.iter().enumerate().find(|(_, c)| !c.is_finite()) {
        return Err(FitError::CoefficientOverflow { index, value });
    }

    let observed: Vec<f64> = samples.iter().map(|s| s.y).collect();
    let fitted: Vec<f64> = samples.iter().map(|s| predict(family, s.x, &coefficients)).collect();
    if let Some(index) = fitted.iter().position(|v| !v.is_finite()) {
        return Err(FitError::NonFinitePrediction { index });
    }

    let quality = fit_quality(&observed, &fitted);
    if !(quality.sse.is_finite() && quality.r_squared.is_finite()) {
        return Err(FitError::QualityOverflow { sse: quality.sse });
    }

    let expression = render_expression(family, &coefficients, opts.significant_digits);

    Ok(FittedModel {
        family,
        coefficients,
        quality,
        expression,
    })
}

fn validate(samples: &[SamplePair], family: ModelFamily) -> Result<(), FitError> {
    if let ModelFamily::Polynomial(order) = family {
        if !family.has_valid_order() {
            return Err(FitError::InvalidOrder(order));
        }
    }

    let required = family.minimum_points();
    if samples.len() < required {
        return Err(FitError::InsufficientData {
            required,
            actual: samples.len(),
        });
    }

    for (index, s) in samples.iter().enumerate() {
        if !(s.x.is_finite() && s.y.is_finite()) {
            return Err(FitError::NonFiniteSample { index });
        }
    }

    if family.needs_positive_x() {
        if let Some((index, s)) = samples.iter().enumerate().find(|(_, s)| s.x <= 0.0) {
            return Err(FitError::NonPositiveX { index, value: s.x });
        }
    }
    if family.needs_positive_y() {
        if let Some((index, s)) = samples.iter().enumerate().find(|(_, s)| s.y <= 0.0) {
            return Err(FitError::NonPositiveY { index, value: s.y });
        }
    }

    Ok(())
}
