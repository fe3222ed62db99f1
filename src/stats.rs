use crate::error::{ProjectionError, Result};
use crate::models::TrendLine;
use serde::{Deserialize, Serialize};

/// Summary statistics of the observed daily counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute count, min, max, mean and median. NaNs are ignored.
pub fn summarize(values: &[f64]) -> SeriesSummary {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    SeriesSummary { count, min, max, mean, median }
}

/// Ordinary least squares fit `y = slope * x + intercept`.
///
/// `r_squared` is the squared Pearson correlation of `x` and `y`, clamped to
/// `[0, 1]`. A constant `y` yields `r_squared = 0`. No weighting, no outlier
/// rejection.
///
/// ### Errors
/// `InsufficientData` when fewer than two points or fewer than two distinct
/// `x` values are given, or when the slices differ in length.
pub fn fit_trend(xs: &[f64], ys: &[f64]) -> Result<TrendLine> {
    let n = xs.len();
    let distinct = count_distinct(xs);
    if n != ys.len() || n < 2 || distinct < 2 {
        return Err(ProjectionError::InsufficientData {
            points: n.min(ys.len()),
            distinct,
        });
    }

    let nf = n as f64;
    let x_mean = xs.iter().sum::<f64>() / nf;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let r_squared = if syy == 0.0 {
        0.0
    } else {
        (sxy * sxy / (sxx * syy)).clamp(0.0, 1.0)
    };

    log::debug!("trend fit: slope={slope} intercept={intercept} r2={r_squared}");
    Ok(TrendLine {
        slope,
        intercept,
        r_squared,
    })
}

fn count_distinct(xs: &[f64]) -> usize {
    let mut sorted: Vec<f64> = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}
