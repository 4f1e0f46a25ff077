//! Curve fitting.
//!
//! Responsibilities:
//!
//! - fit one model family to a sample set (`fit`, `fit_with_options`)
//! - compare every family on the same samples (`rank_families`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
