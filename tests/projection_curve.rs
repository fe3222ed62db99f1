use chrono::NaiveDate;
use vax_projection::TrendLine;
use vax_projection::projection::{ProjectionParams, project};

fn params(samples: usize, current: f64, threshold: f64) -> ProjectionParams {
    ProjectionParams {
        min_day: 0.0,
        horizon_day: 240.0,
        samples,
        current_fully_vaccinated: current,
        population_threshold: threshold,
        doses_per_person: 2.0,
    }
}

fn flat(rate: f64) -> TrendLine {
    TrendLine {
        slope: 0.0,
        intercept: rate,
        r_squared: 0.0,
    }
}

#[test]
fn curve_has_one_point_per_nonzero_sample() {
    for n in [2usize, 3, 10, 1000] {
        let p = project(&flat(1.0), &params(n, 0.0, 1e12));
        assert_eq!(p.x.len(), n);
        assert_eq!(p.yhat.len(), n);
        assert_eq!(p.curve.len(), n - 1);
        assert_eq!(p.curve.points[0].day, p.x[1]);
        assert_eq!(p.curve.points.last().unwrap().day, 240.0);
    }
}

#[test]
fn constant_rate_crosses_on_the_expected_sample() {
    // 241 samples put one sample on every whole day; 2M doses/day is 1M people/day.
    let p = project(&flat(2_000_000.0), &params(241, 100_500_000.0, 330e6));
    let day = p.crossover_day.expect("threshold is crossed");
    assert!((day - 230.0 / 241.0 * 240.0).abs() < 1e-9, "day = {day}");

    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let r = p.result(start).unwrap();
    assert_eq!(r.crossover_day, Some(day));
    // 229.04 days, fractional part dropped
    assert_eq!(r.crossover_date, NaiveDate::from_ymd_opt(2021, 8, 18));
}

#[test]
fn cumulative_values_integrate_halve_and_offset() {
    let p = project(&flat(2_000_000.0), &params(241, 100_500_000.0, 330e6));
    for (i, pt) in p.curve.points.iter().enumerate() {
        let day = (i + 1) as f64;
        let want = 1_000_000.0 * day + 100_500_000.0;
        assert!((pt.fully_vaccinated - want).abs() < 1e-3, "day {day}");
    }
}

#[test]
fn falling_rate_never_crosses_and_is_not_zero() {
    let trend = TrendLine {
        slope: -1_000.0,
        intercept: 10_000.0,
        r_squared: 1.0,
    };
    let p = project(&trend, &params(1000, 1_000.0, 330e6));
    assert_eq!(p.crossover_day, None);

    let r = p.result(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
    assert!(!r.is_found());
    assert_eq!(r.crossover_date, None);

    // No clamping: the projected rate goes negative and the curve turns down.
    assert!(p.yhat.last().unwrap() < &0.0);
    let last = p.curve.points.last().unwrap().fully_vaccinated;
    let peak = p
        .curve
        .points
        .iter()
        .map(|c| c.fully_vaccinated)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(last < peak);
}

#[test]
fn zero_rate_never_crosses() {
    let p = project(&flat(0.0), &params(500, 10.0, 330e6));
    assert_eq!(p.crossover_day, None);
}

#[test]
fn already_above_threshold_crosses_on_first_index() {
    let p = project(&flat(0.0), &params(1000, 400e6, 330e6));
    let day = p.crossover_day.expect("crossing on the first index is still a crossing");
    assert!((day - 0.24).abs() < 1e-12);
    let r = p.result(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
    assert_eq!(r.crossover_date, NaiveDate::from_ymd_opt(2021, 1, 1));
}

#[test]
fn min_day_offsets_the_grid_and_crossover() {
    let mut prm = params(11, 400e6, 330e6);
    prm.min_day = 5.0;
    let p = project(&flat(0.0), &prm);
    assert_eq!(p.x[0], 5.0);
    let day = p.crossover_day.unwrap();
    assert!((day - (5.0 + 1.0 / 11.0 * 240.0)).abs() < 1e-12);
}
