//! Ordinary least-squares fitting.
//!
//! Shared by trend classification (slope and windowed r²), pattern
//! trendlines (fits over extremum indices) and downstream report
//! scoring (whole-series r²).

use crate::analysis::stats;

/// Result of a least-squares line fit
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, `1 - SSres/SStot`; 0.0 for a series
    /// with zero variance.
    pub r_squared: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at position `x`
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Fitted values over positions `0..len`
    pub fn fitted(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.predict(i as f64)).collect()
    }
}

/// Fit `value ≈ slope * index + intercept` over positions `0..n`.
///
/// Returns `None` for fewer than two points.
pub fn fit_series(values: &[f64]) -> Option<LinearFit> {
    if values.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    fit_xy(&xs, values)
}

/// Fit over explicit x positions (e.g. extremum indices).
///
/// Returns `None` for fewer than two points or zero x-variance.
pub fn fit_xy(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    let x_mean = stats::mean(xs);
    let y_mean = stats::mean(ys);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = xs[i] - x_mean;
        sxx += dx * dx;
        sxy += dx * (ys[i] - y_mean);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for i in 0..n {
        let residual = ys[i] - (slope * xs[i] + intercept);
        ss_res += residual * residual;
        let deviation = ys[i] - y_mean;
        ss_tot += deviation * deviation;
    }
    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}
