//! Result exports.
//!
//! - per-regime CSV (`export`)
//! - full-run JSON (`results`)

pub mod export;
pub mod results;

pub use export::*;
pub use results::*;
