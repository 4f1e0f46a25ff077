//! Sample data bundled with the tool.

pub mod sample;

pub use sample::*;
