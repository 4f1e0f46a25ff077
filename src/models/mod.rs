//! Regression model families.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic over the family.

pub mod model;

pub use model::*;
