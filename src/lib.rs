//! `wvtr-fit` library crate.
//!
//! The binary (`wvtr`) is a thin wrapper around this library so that the
//! fitting and Fick's-law algebra are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
