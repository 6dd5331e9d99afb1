//! Ordinary least squares for straight-line fits.
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! The design matrix is `[1, x_i]` per row. We solve it through SVD so that tall
//! systems (more samples than parameters) are handled without normal equations.

use nalgebra::{DMatrix, DVector};

/// Singular-value cutoff for the SVD solve.
const SVD_EPS: f64 = 1e-12;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the solve fails or yields non-finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let beta = svd.solve(y, SVD_EPS).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Fit `y = slope·x + intercept`, returning `(slope, intercept)`.
///
/// Inputs are centred on their means before solving. Thickness values sit far
/// from zero relative to their spread, and centring keeps the design well
/// conditioned. Callers must ensure at least two distinct `x` values.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len();
    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x - x_mean;
    }
    let y = DVector::from_iterator(n, ys.iter().map(|v| v - y_mean));

    let beta = solve_least_squares(&design, &y)?;
    let slope = beta[1];
    let intercept = y_mean + beta[0] - slope * x_mean;
    (slope.is_finite() && intercept.is_finite()).then_some((slope, intercept))
}

/// Coefficient of determination and RMSE for a fitted line.
///
/// When every `y` is identical the total sum of squares is zero; R² is then 1
/// for an exact fit and 0 otherwise.
pub fn line_fit_stats(xs: &[f64], ys: &[f64], slope: f64, intercept: f64) -> (f64, f64) {
    let y_mean = mean(ys);
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let r = y - (slope * x + intercept);
        ss_res += r * r;
        ss_tot += (y - y_mean).powi(2);
    }
    let n = xs.len().max(1) as f64;
    let rmse = (ss_res / n).sqrt();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };
    (r_squared, rmse)
}

/// Number of distinct values, compared exactly.
pub fn distinct_count(xs: &[f64]) -> usize {
    let mut v: Vec<f64> = xs.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v.dedup();
    v.len()
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| -2.0 * x + 10.0).collect();
        let (m, b) = fit_line(&xs, &ys).unwrap();
        assert!((m + 2.0).abs() < 1e-10, "slope {m}");
        assert!((b - 10.0).abs() < 1e-10, "intercept {b}");
    }

    #[test]
    fn fit_line_rejects_single_point() {
        assert!(fit_line(&[1.0], &[2.0]).is_none());
    }

    #[test]
    fn stats_of_exact_fit() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 3.0, 5.0];
        let (r2, rmse) = line_fit_stats(&xs, &ys, 2.0, 1.0);
        assert!((r2 - 1.0).abs() < 1e-12);
        assert!(rmse.abs() < 1e-12);
    }

    #[test]
    fn stats_of_noisy_fit_are_below_one() {
        let xs = [57.0, 60.0, 62.0];
        let ys = [3363.0, 2232.0, 1922.0];
        let (m, b) = fit_line(&xs, &ys).unwrap();
        let (r2, rmse) = line_fit_stats(&xs, &ys, m, b);
        assert!(r2 > 0.9 && r2 < 1.0, "r2 {r2}");
        assert!(rmse > 0.0);
    }

    #[test]
    fn distinct_count_dedups() {
        assert_eq!(distinct_count(&[5.0, 5.0, 5.0]), 1);
        assert_eq!(distinct_count(&[5.0, 6.0, 5.0]), 2);
    }
}
