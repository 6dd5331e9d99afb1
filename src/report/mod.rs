//! Console reporting.
//!
//! Formatting lives here so the analyzer stays free of presentation concerns
//! and output changes are localized.

pub mod format;

pub use format::*;
