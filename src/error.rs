//! Error types.
//!
//! The numerical core reports typed errors (`FitError`, `IntegrationError`) that
//! carry the offending value, index or parameter. The command-line front end
//! folds everything into `AppError`, which only knows a message and an exit code.

use thiserror::Error;

use crate::expr::{EvalError, ParseError};

/// Exit code for bad input: unreadable files, invalid flags, bad bounds.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for a failed curve fit.
pub const EXIT_FIT: u8 = 3;
/// Exit code for a failed integration.
pub const EXIT_INTEGRATE: u8 = 4;

/// Failure modes of `fit`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("not enough samples: the model needs at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("polynomial order must be between 1 and 10, got {0}")]
    InvalidOrder(usize),

    #[error("sample {index} has non-positive x = {value}; the model takes ln(x)")]
    NonPositiveX { index: usize, value: f64 },

    #[error("sample {index} has non-positive y = {value}; the model takes ln(y)")]
    NonPositiveY { index: usize, value: f64 },

    #[error("sample {index} is not a finite (x, y) pair")]
    NonFiniteSample { index: usize },

    #[error(
        "design matrix is rank deficient (rank {rank} of {columns}); the samples need more distinct x values"
    )]
    SingularSystem { rank: usize, columns: usize },

    #[error("coefficient {index} overflowed to {value}")]
    CoefficientOverflow { index: usize, value: f64 },

    #[error("fitted value at sample {index} is not finite")]
    NonFinitePrediction { index: usize },

    #[error("fit quality overflowed (SSE = {sse})")]
    QualityOverflow { sse: f64 },
}

/// Failure modes of `integrate`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("subdivision count must be an even number >= 2, got {0}")]
    InvalidSubdivisionCount(usize),

    #[error("{name} bound is not finite: {value}")]
    NonFiniteBound { name: &'static str, value: f64 },

    #[error("cannot parse expression: {0}")]
    ExpressionParse(#[from] ParseError),

    #[error("integrand is undefined at x = {x}: {reason}")]
    EvaluationDomain { x: f64, reason: EvalError },
}

/// Front-end error: a message plus the process exit code to report it with.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for an input/configuration error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(EXIT_FIT, format!("Fit failed: {err}"))
    }
}

impl From<IntegrationError> for AppError {
    fn from(err: IntegrationError) -> Self {
        AppError::new(EXIT_INTEGRATE, format!("Integration failed: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
