//! Input/output helpers.
//!
//! - CSV sample ingest with row-level validation (`ingest`)
//! - residual CSV and JSON fit exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
