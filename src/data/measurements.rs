//! Embedded WVTR measurements for the Biopolymer-1 coating builds.
//!
//! Each row is `(regime key, regime label, thickness µm, WVTR g/(m²·day))`.
//! Rows for one regime are contiguous; `regimes()` groups them in table order.

use crate::domain::{Regime, Sample};

/// Regime whose thickness span carries the impermeable-PLA comparison curve.
pub const LIMIT_REGIME: &str = "4x_pla";

pub type MeasurementRow = (&'static str, &'static str, f64, f64);

pub const MEASUREMENTS: &[MeasurementRow] = &[
    ("1x", "1× Biopolymer-1", 57.0, 3363.0),
    ("1x", "1× Biopolymer-1", 60.0, 2232.0),
    ("1x", "1× Biopolymer-1", 62.0, 1922.0),
    ("2x", "2× Biopolymer-1", 72.0, 2395.0),
    ("2x", "2× Biopolymer-1", 74.0, 1673.0),
    ("2x", "2× Biopolymer-1", 79.0, 1513.0),
    ("3x", "3× Biopolymer-1", 73.0, 2177.0),
    ("3x", "3× Biopolymer-1", 76.0, 1739.0),
    ("3x", "3× Biopolymer-1", 79.0, 1470.0),
    ("4x_pla", "4× Biopolymer-1 + PLA", 64.0, 1880.0),
    ("4x_pla", "4× Biopolymer-1 + PLA", 79.0, 452.0),
    ("4x_pla", "4× Biopolymer-1 + PLA", 81.0, 414.0),
    ("4x_pla", "4× Biopolymer-1 + PLA", 83.0, 212.0),
];

/// The embedded dataset grouped into regimes.
pub fn regimes() -> Vec<Regime> {
    group_rows(MEASUREMENTS)
}

/// Group rows by regime key, keeping first-appearance order.
pub fn group_rows(rows: &[MeasurementRow]) -> Vec<Regime> {
    let mut out: Vec<Regime> = Vec::new();
    for &(key, label, h, wvtr) in rows {
        let sample = Sample::new(h, wvtr);
        match out.iter_mut().find(|r| r.key == key) {
            Some(regime) => regime.samples.push(sample),
            None => out.push(Regime::new(key, label, vec![sample])),
        }
    }
    out
}

/// Look up a regime by key.
pub fn find_regime<'a>(regimes: &'a [Regime], key: &str) -> Option<&'a Regime> {
    regimes.iter().find(|r| r.key == key)
}
