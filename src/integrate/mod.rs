//! Definite integration by composite Simpson rule.
//!
//! The integrand is either text in the expression language (parsed once, then
//! evaluated at every node) or a plain Rust function. The subdivision count is
//! fixed by the caller; there is no adaptive refinement.

pub mod simpson;

pub use simpson::*;
