//! Regression figures.
//!
//! Output is SVG. The bitmap backend needs a native font stack for text, which
//! this crate does not link.

use std::error::Error;
use std::path::{Path, PathBuf};

use log::debug;
use plotters::prelude::*;

use crate::domain::{Line, Regime};
use crate::error::AnalysisError;
use crate::plot::config::{PlotConfig, series_color};

/// Points sampled along each fitted line.
const DEFAULT_FIT_POINTS: usize = 100;

/// Every n-th limit-curve point gets a marker; the gaps read as a dotted line.
const LIMIT_MARKER_STRIDE: usize = 4;

/// One regime's data and fit, as drawn on a figure.
#[derive(Debug, Clone, Copy)]
pub struct PlotSeries<'a> {
    pub regime: &'a Regime,
    pub line: &'a Line,
}

/// Sampled impermeable-limit curve.
#[derive(Debug, Clone, Copy)]
pub struct LimitSeries<'a> {
    pub label: &'a str,
    pub points: &'a [(f64, f64)],
}

/// Deterministic artifact path for a regime's figure.
pub fn regime_plot_path(out_dir: &Path, key: &str) -> PathBuf {
    out_dir.join(format!("{key}_regression.svg"))
}

/// Deterministic artifact path for the combined figure.
pub fn combined_plot_path(out_dir: &Path) -> PathBuf {
    out_dir.join("combined_regression.svg")
}

/// Scatter of one regime's samples overlaid with its fitted line.
pub fn plot(
    regime: &Regime,
    line: &Line,
    limit: Option<LimitSeries<'_>>,
    path: &Path,
    config: &PlotConfig,
) -> Result<(), AnalysisError> {
    let series = [PlotSeries { regime, line }];
    render(&series, limit, path, config, Some(config.line_color))
}

/// All regimes' fitted lines plus the impermeable-limit curve.
pub fn plot_combined(
    series: &[PlotSeries<'_>],
    limit: Option<LimitSeries<'_>>,
    path: &Path,
    config: &PlotConfig,
) -> Result<(), AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::PlotWrite {
            path: path.display().to_string(),
            message: "no regimes to plot".to_string(),
        });
    }
    render(series, limit, path, config, None)
}

fn render(
    series: &[PlotSeries<'_>],
    limit: Option<LimitSeries<'_>>,
    path: &Path,
    config: &PlotConfig,
    fixed_color: Option<RGBColor>,
) -> Result<(), AnalysisError> {
    debug!("writing {}", path.display());
    let bounds = bounds(series, limit).ok_or_else(|| AnalysisError::PlotWrite {
        path: path.display().to_string(),
        message: "no finite data to plot".to_string(),
    })?;

    let backend = SVGBackend::new(path, (config.width, config.height));
    render_impl(backend, series, limit, config, fixed_color, bounds).map_err(|e| AnalysisError::PlotWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// `(x0, x1, y0, y1)` covering samples, fits, and limit, with a little padding.
fn bounds(series: &[PlotSeries<'_>], limit: Option<LimitSeries<'_>>) -> Option<(f64, f64, f64, f64)> {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for s in series {
        for sample in &s.regime.samples {
            xs.push(sample.thickness_um);
            ys.push(sample.wvtr);
        }
        if let Some((lo, hi)) = s.regime.thickness_span() {
            ys.push(s.line.predict(lo));
            ys.push(s.line.predict(hi));
        }
    }
    if let Some(l) = limit {
        for &(x, y) in l.points {
            xs.push(x);
            ys.push(y);
        }
    }

    let (x0, x1) = finite_range(&xs)?;
    let (y0, y1) = finite_range(&ys)?;

    let x_pad = ((x1 - x0) * 0.05).max(1.0);
    let y_lo = y0.min(0.0);
    let y_hi = if y1 > y_lo { y1 * 1.1 } else { y_lo + 1.0 };
    Some((x0 - x_pad, x1 + x_pad, y_lo, y_hi))
}

fn finite_range(v: &[f64]) -> Option<(f64, f64)> {
    v.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

fn render_impl<DB: DrawingBackend>(
    backend: DB,
    series: &[PlotSeries<'_>],
    limit: Option<LimitSeries<'_>>,
    config: &PlotConfig,
    fixed_color: Option<RGBColor>,
    (x0, x1, y0, y1): (f64, f64, f64, f64),
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let fmt_x = |x: &f64| format!("{x:.0}");
    let fmt_y = |y: &f64| format!("{y:.0}");
    let mut mesh = chart.configure_mesh();
    if !config.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = fixed_color.unwrap_or_else(|| series_color(idx));
        let marker = config.marker_size;

        chart
            .draw_series(
                s.regime
                    .samples
                    .iter()
                    .map(|p| Circle::new((p.thickness_um, p.wvtr), marker, color.filled())),
            )?
            .label(s.regime.label.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), marker, color.filled()));

        if let Some((lo, hi)) = s.regime.thickness_span() {
            chart
                .draw_series(LineSeries::new(
                    s.line.sample(lo, hi, DEFAULT_FIT_POINTS),
                    ShapeStyle::from(&color).stroke_width(config.line_width),
                ))?
                .label(format!("{} fit", s.regime.label))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if let Some(l) = limit {
        let color = config.limit_color;
        chart
            .draw_series(
                l.points
                    .iter()
                    .step_by(LIMIT_MARKER_STRIDE)
                    .map(|&(x, y)| Circle::new((x, y), 2, color.filled())),
            )?
            .label(l.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&config.background.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    fn fixture() -> (Regime, Line) {
        let regime = Regime::new(
            "demo",
            "Demo",
            vec![Sample::new(50.0, 12.0), Sample::new(100.0, 9.0), Sample::new(150.0, 6.0)],
        );
        let line = Line { slope: -0.06, intercept: 15.0 };
        (regime, line)
    }

    #[test]
    fn artifact_names_follow_regime_key() {
        let dir = Path::new("out");
        assert_eq!(regime_plot_path(dir, "4x_pla"), dir.join("4x_pla_regression.svg"));
        assert_eq!(combined_plot_path(dir), dir.join("combined_regression.svg"));
    }

    #[test]
    fn plot_writes_svg() {
        let tmp = tempfile::tempdir().unwrap();
        let (regime, line) = fixture();
        let path = regime_plot_path(tmp.path(), &regime.key);

        plot(&regime, &line, None, &path, &PlotConfig::regime("Demo", 1.0, 0)).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Demo (R² = 1.00)"));
    }

    #[test]
    fn combined_plot_is_byte_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let (regime, line) = fixture();
        let limit_points: Vec<(f64, f64)> = (0..20).map(|i| (50.0 + 5.0 * i as f64, 1.0)).collect();
        let limit = LimitSeries {
            label: "PLA impermeable",
            points: &limit_points,
        };
        let series = [PlotSeries {
            regime: &regime,
            line: &line,
        }];

        let a = tmp.path().join("a.svg");
        let b = tmp.path().join("b.svg");
        plot_combined(&series, Some(limit), &a, &PlotConfig::combined()).unwrap();
        plot_combined(&series, Some(limit), &b, &PlotConfig::combined()).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn unwritable_path_is_a_plot_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (regime, line) = fixture();
        let path = tmp.path().join("missing").join("nested").join("x.svg");

        let err = plot(&regime, &line, None, &path, &PlotConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::PlotWrite { .. }));
    }

    #[test]
    fn combined_requires_series() {
        let err = plot_combined(&[], None, Path::new("unused.svg"), &PlotConfig::combined()).unwrap_err();
        assert!(matches!(err, AnalysisError::PlotWrite { .. }));
    }
}
