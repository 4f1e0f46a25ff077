//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sample observations (`SamplePair`)
//! - the model family selector (`ModelFamily`, and its CLI counterpart `ModelSpec`)
//! - fit outputs (`FittedModel`, `FitQuality`, `ResidualRow`)
//! - run configuration (`RunConfig`)

pub mod types;

pub use types::*;
