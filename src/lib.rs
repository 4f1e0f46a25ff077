//! `fit-integrate` library crate.
//!
//! Fits best-approximating curves (linear, exponential, logarithmic, power,
//! polynomial) to `(x, y)` samples by least squares and integrates the fitted
//! expression with a composite Simpson rule.
//!
//! The binary (`fitint`) is a thin wrapper around this library so the core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod expr;
pub mod fit;
pub mod integrate;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
