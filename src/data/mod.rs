//! Measurement data.
//!
//! The dataset is a small embedded table; there is no file format to ingest.

pub mod measurements;

pub use measurements::*;
