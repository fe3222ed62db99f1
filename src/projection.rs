//! Forward projection of the fitted daily rate.
//!
//! The trend line gives a daily vaccination rate. Integrating it from the first
//! sample gives cumulative doses; dividing by the doses-per-person divisor and
//! adding the people already fully vaccinated gives the projected number of
//! fully vaccinated people. The rate is not clamped, so a negative slope makes
//! the curve turn down eventually.
use crate::config::Config;
use crate::error::{ProjectionError, Result};
use crate::models::{CurvePoint, ProjectionCurve, ProjectionResult, TrendLine};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Inputs of one projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub min_day: f64,
    pub horizon_day: f64,
    pub samples: usize,
    pub current_fully_vaccinated: f64,
    pub population_threshold: f64,
    pub doses_per_person: f64,
}

impl ProjectionParams {
    pub fn from_config(config: &Config, min_day: f64, current_fully_vaccinated: f64) -> Self {
        Self {
            min_day,
            horizon_day: config.projection_horizon_days,
            samples: config.samples,
            current_fully_vaccinated,
            population_threshold: config.population_threshold,
            doses_per_person: config.doses_per_person,
        }
    }
}

/// Sample grid, fitted rate and cumulative curve of one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// `samples` evenly spaced days over `[min_day, horizon_day]`.
    pub x: Vec<f64>,
    /// Fitted daily rate at every `x`.
    pub yhat: Vec<f64>,
    pub curve: ProjectionCurve,
    pub crossover_day: Option<f64>,
}

impl Projection {
    /// Attach a calendar date to the crossover day, dropping the fractional part.
    pub fn result(&self, first_date: NaiveDate) -> Result<ProjectionResult> {
        let Some(day) = self.crossover_day else {
            return Ok(ProjectionResult::not_found());
        };
        let date = TimeDelta::try_days(day.trunc() as i64)
            .and_then(|d| first_date.checked_add_signed(d))
            .ok_or_else(|| {
                ProjectionError::Config(format!("crossover day {day} is out of calendar range"))
            })?;
        Ok(ProjectionResult {
            crossover_day: Some(day),
            crossover_date: Some(date),
        })
    }
}

/// Project the trend forward and find the first threshold crossing.
///
/// The curve has one point per sample index `1..samples`; index 0 would be a
/// zero-width integral and is skipped. The crossover day for the first index
/// `i` whose value exceeds the threshold is `min_day + (i / samples) * horizon_day`.
pub fn project(trend: &TrendLine, params: &ProjectionParams) -> Projection {
    let x = linspace(params.min_day, params.horizon_day, params.samples);
    let yhat: Vec<f64> = x.iter().map(|&xi| trend.predict(xi)).collect();

    let points: Vec<CurvePoint> = (1..x.len())
        .map(|i| CurvePoint {
            day: x[i],
            fully_vaccinated: simpson(&yhat[..=i], &x[..=i]) / params.doses_per_person
                + params.current_fully_vaccinated,
        })
        .collect();

    let crossover_day = points
        .iter()
        .position(|p| p.fully_vaccinated > params.population_threshold)
        .map(|pos| {
            let i = pos + 1;
            params.min_day + (i as f64 / params.samples as f64) * params.horizon_day
        });

    Projection {
        x,
        yhat,
        curve: ProjectionCurve { points },
        crossover_day,
    }
}

/// `n` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Composite Simpson integral of samples `y` over evenly spaced `x`.
///
/// Even interval counts use the 1/3 rule throughout. Odd counts use the 1/3 rule
/// on the leading even run and the 3/8 rule on the last three intervals. A
/// single interval falls back to the trapezoid rule.
pub fn simpson(y: &[f64], x: &[f64]) -> f64 {
    let n = y.len().min(x.len());
    if n < 2 {
        return 0.0;
    }
    let h = (x[n - 1] - x[0]) / (n - 1) as f64;
    let intervals = n - 1;
    if intervals == 1 {
        return h * (y[0] + y[1]) / 2.0;
    }

    let third_end = if intervals % 2 == 0 { intervals } else { intervals - 3 };
    let mut total = simpson_third(&y[..=third_end], h);
    if third_end < intervals {
        let t = &y[third_end..=intervals];
        total += 3.0 * h / 8.0 * (t[0] + 3.0 * t[1] + 3.0 * t[2] + t[3]);
    }
    total
}

// Expects an even number of intervals (odd number of samples); zero intervals give 0.
fn simpson_third(y: &[f64], h: f64) -> f64 {
    if y.len() < 3 {
        return 0.0;
    }
    let last = y.len() - 1;
    let inner: f64 = y[1..last]
        .iter()
        .enumerate()
        .map(|(k, v)| if k % 2 == 0 { 4.0 * v } else { 2.0 * v })
        .sum();
    h / 3.0 * (y[0] + inner + y[last])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_linear(m: f64, b: f64, a: f64, z: f64) -> f64 {
        m / 2.0 * (z * z - a * a) + b * (z - a)
    }

    #[test]
    fn simpson_is_exact_for_lines_with_even_and_odd_intervals() {
        for n in 2..12 {
            let x = linspace(0.0, 10.0, n);
            let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
            let got = simpson(&y, &x);
            let want = exact_linear(3.0, 1.0, 0.0, 10.0);
            assert!((got - want).abs() < 1e-9, "n={n}: got {got}, want {want}");
        }
    }

    #[test]
    fn simpson_is_exact_for_quadratics_with_even_intervals() {
        let x = linspace(0.0, 2.0, 5);
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        assert!((simpson(&y, &x) - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let x = linspace(3.0, 240.0, 1000);
        assert_eq!(x.len(), 1000);
        assert_eq!(x[0], 3.0);
        assert_eq!(x[999], 240.0);
        assert!(x.windows(2).all(|w| w[1] > w[0]));
    }
}
