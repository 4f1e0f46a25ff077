//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and integration
//! - printed as JSON by the front end
//! - compared directly in tests

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::expr::DEFAULT_SIGNIFICANT_DIGITS;
use crate::models::predict;

/// Lowest accepted polynomial order.
pub const MIN_POLYNOMIAL_ORDER: usize = 1;
/// Highest accepted polynomial order.
pub const MAX_POLYNOMIAL_ORDER: usize = 10;

/// Default subdivision count for the composite Simpson rule.
pub const DEFAULT_SUBDIVISIONS: usize = 1000;

/// One `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePair {
    pub x: f64,
    pub y: f64,
}

impl SamplePair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for SamplePair {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Functional form used for regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", content = "order", rename_all = "lowercase")]
pub enum ModelFamily {
    /// `y = a + b·x`
    Linear,
    /// `y = a·e^(b·x)`
    Exponential,
    /// `y = a + b·ln(x)`
    Logarithmic,
    /// `y = a·x^b`
    Power,
    /// `y = c0 + c1·x + … + ck·x^k`
    Polynomial(usize),
}

impl ModelFamily {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> String {
        match self {
            ModelFamily::Linear => "linear".to_string(),
            ModelFamily::Exponential => "exponential".to_string(),
            ModelFamily::Logarithmic => "logarithmic".to_string(),
            ModelFamily::Power => "power".to_string(),
            ModelFamily::Polynomial(order) => format!("polynomial (order {order})"),
        }
    }

    /// Number of free coefficients.
    pub fn param_count(self) -> usize {
        match self {
            ModelFamily::Linear
            | ModelFamily::Exponential
            | ModelFamily::Logarithmic
            | ModelFamily::Power => 2,
            ModelFamily::Polynomial(order) => order + 1,
        }
    }

    /// Smallest sample count that can determine every coefficient.
    pub fn minimum_points(self) -> usize {
        self.param_count()
    }

    /// True unless this is a polynomial with an order outside `[1, 10]`.
    pub fn has_valid_order(self) -> bool {
        match self {
            ModelFamily::Polynomial(order) => {
                (MIN_POLYNOMIAL_ORDER..=MAX_POLYNOMIAL_ORDER).contains(&order)
            }
            _ => true,
        }
    }

    /// True if the model takes `ln(x)`.
    pub fn needs_positive_x(self) -> bool {
        matches!(self, ModelFamily::Logarithmic | ModelFamily::Power)
    }

    /// True if the model is fitted against `ln(y)`.
    pub fn needs_positive_y(self) -> bool {
        matches!(self, ModelFamily::Exponential | ModelFamily::Power)
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which model family the front end should fit.
///
/// The polynomial order comes from a separate `--order` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Linear,
    Exponential,
    Logarithmic,
    Power,
    Polynomial,
}

impl ModelSpec {
    pub fn to_family(self, order: usize) -> ModelFamily {
        match self {
            ModelSpec::Linear => ModelFamily::Linear,
            ModelSpec::Exponential => ModelFamily::Exponential,
            ModelSpec::Logarithmic => ModelFamily::Logarithmic,
            ModelSpec::Power => ModelFamily::Power,
            ModelSpec::Polynomial => ModelFamily::Polynomial(order),
        }
    }
}

/// Fitting options that affect the rendered output, not the coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    /// Significant digits used when rendering coefficients into the expression.
    pub significant_digits: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

/// Fit quality diagnostics, measured on the original (untransformed) scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub r_squared: f64,
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Output of a successful fit.
///
/// Coefficient layout per family:
///
/// - linear / logarithmic: `[a, b]` for `a + b·g(x)`
/// - exponential / power: `[a, b]` for `a·e^(b·x)` / `a·x^b`
/// - polynomial: `[c0, c1, …, ck]` in ascending powers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub family: ModelFamily,
    pub coefficients: Vec<f64>,
    pub quality: FitQuality,
    /// The model written in the expression language (parseable by `expr::parse`).
    pub expression: String,
}

impl FittedModel {
    /// Evaluate the fitted curve at `x`.
    ///
    /// Outside the family's domain (e.g. `x <= 0` for logarithmic) this returns a
    /// non-finite value; the integrator reports that as a domain error.
    pub fn predict(&self, x: f64) -> f64 {
        predict(self.family, x, &self.coefficients)
    }

    /// An owned evaluator closure that captures the coefficients.
    pub fn evaluator(&self) -> impl Fn(f64) -> f64 + Send + Sync + 'static {
        let family = self.family;
        let coefficients = self.coefficients.clone();
        move |x| predict(family, x, &coefficients)
    }

    /// `(x, ŷ)` for every sample x.
    pub fn fitted_points(&self, samples: &[SamplePair]) -> Vec<(f64, f64)> {
        samples.iter().map(|s| (s.x, self.predict(s.x))).collect()
    }

    /// Observed vs fitted values for every sample.
    pub fn residuals(&self, samples: &[SamplePair]) -> Vec<ResidualRow> {
        samples
            .iter()
            .map(|s| {
                let y_fit = self.predict(s.x);
                ResidualRow {
                    x: s.x,
                    y_obs: s.y,
                    y_fit,
                    residual: s.y - y_fit,
                }
            })
            .collect()
    }
}

/// A per-sample fitted result (used for reports and exports).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualRow {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Summary stats about the samples used for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    /// x of the first sample (the lower integration limit allowed by the front end).
    pub x_first: f64,
    /// x of the last sample (the upper integration limit allowed by the front end).
    pub x_last: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    /// Returns `None` for an empty sample set.
    pub fn from_samples(samples: &[SamplePair]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        let mut stats = Self {
            n_points: samples.len(),
            x_first: first.x,
            x_last: last.x,
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for s in samples {
            stats.x_min = stats.x_min.min(s.x);
            stats.x_max = stats.x_max.max(s.x);
            stats.y_min = stats.y_min.min(s.y);
            stats.y_max = stats.y_max.max(s.y);
        }
        Some(stats)
    }
}

/// Integration bounds requested by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// A definite integral of the fitted expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegralResult {
    pub lower: f64,
    pub upper: f64,
    pub subdivisions: usize,
    pub value: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags plus environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sample CSV; `None` means the built-in reference dataset.
    pub csv_path: Option<PathBuf>,
    pub family: ModelFamily,
    pub fit_options: FitOptions,

    /// Integrate the fitted expression over these bounds, if set.
    pub bounds: Option<Bounds>,
    pub subdivisions: usize,

    pub json: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_residuals: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_order_bounds() {
        assert!(!ModelFamily::Polynomial(0).has_valid_order());
        assert!(ModelFamily::Polynomial(1).has_valid_order());
        assert!(ModelFamily::Polynomial(10).has_valid_order());
        assert!(!ModelFamily::Polynomial(11).has_valid_order());
        assert!(ModelFamily::Power.has_valid_order());
    }

    #[test]
    fn minimum_points_follow_parameter_count() {
        assert_eq!(ModelFamily::Linear.minimum_points(), 2);
        assert_eq!(ModelFamily::Exponential.minimum_points(), 2);
        assert_eq!(ModelFamily::Polynomial(4).minimum_points(), 5);
    }

    #[test]
    fn family_serializes_with_order() {
        let json = serde_json::to_string(&ModelFamily::Polynomial(3)).unwrap();
        assert_eq!(json, r#"{"family":"polynomial","order":3}"#);
        let json = serde_json::to_string(&ModelFamily::Linear).unwrap();
        assert_eq!(json, r#"{"family":"linear"}"#);
    }

    #[test]
    fn dataset_stats_track_order_and_extremes() {
        let samples = [
            SamplePair::new(3.0, 1.0),
            SamplePair::new(-1.0, 5.0),
            SamplePair::new(2.0, -2.0),
        ];
        let stats = DatasetStats::from_samples(&samples).unwrap();
        assert_eq!(stats.x_first, 3.0);
        assert_eq!(stats.x_last, 2.0);
        assert_eq!(stats.x_min, -1.0);
        assert_eq!(stats.y_max, 5.0);
        assert!(DatasetStats::from_samples(&[]).is_none());
    }
}
