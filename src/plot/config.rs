//! Plot configuration shared by the per-regime and combined figures.

use plotters::prelude::*;

/// Orange, blue, green, red: one colour per coating build, in table order.
const PALETTE: [RGBColor; 6] = [
    RGBColor(255, 165, 0),
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(255, 0, 0),
    RGBColor(128, 0, 128),
    RGBColor(0, 160, 160),
];

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1000)
    pub width: u32,
    /// Image height in pixels (default: 700)
    pub height: u32,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub background: RGBColor,
    /// Colour for single-regime plots.
    pub line_color: RGBColor,
    /// Colour of the impermeable-limit markers.
    pub limit_color: RGBColor,
    pub line_width: u32,
    /// Scatter marker radius in pixels.
    pub marker_size: u32,
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            title: "WVTR vs Coating Thickness".to_string(),
            xlabel: "Coating Thickness (µm)".to_string(),
            ylabel: "WVTR (g/m²·day)".to_string(),
            background: WHITE,
            line_color: PALETTE[0],
            limit_color: BLACK,
            line_width: 2,
            marker_size: 5,
            show_grid: true,
        }
    }
}

impl PlotConfig {
    /// Per-regime figure, titled with the regime label and R².
    pub fn regime(label: &str, r_squared: f64, index: usize) -> Self {
        Self {
            title: format!("{label} (R² = {r_squared:.2})"),
            line_color: series_color(index),
            ..Self::default()
        }
    }

    /// Figure overlaying every regime.
    pub fn combined() -> Self {
        Self {
            title: "WVTR vs Coating Thickness - All Coating Scenarios".to_string(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Colour for the regime at `index`, cycling through the palette.
pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regime_title_carries_r_squared() {
        let c = PlotConfig::regime("1× Biopolymer-1", 0.9595, 0);
        assert_eq!(c.title, "1× Biopolymer-1 (R² = 0.96)");
        assert_eq!(c.line_color, RGBColor(255, 165, 0));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), series_color(PALETTE.len()));
    }
}
