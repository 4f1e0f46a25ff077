//! Terminal reports: fit summary, integral, and family ranking.

pub mod format;

pub use format::*;
