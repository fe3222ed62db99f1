use vax_projection::stats::summarize;

#[test]
fn summary_handles_median_even_odd() {
    // [1,2,3,4] -> median = (2+3)/2 = 2.5
    let even = summarize(&[4.0, 1.0, 3.0, 2.0]);
    assert_eq!(even.count, 4);
    assert_eq!(even.min, Some(1.0));
    assert_eq!(even.max, Some(4.0));
    assert!((even.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((even.median.unwrap() - 2.5).abs() < 1e-9);

    // [10, NaN, 30, 20] -> NaN ignored, median = 20
    let odd = summarize(&[10.0, f64::NAN, 30.0, 20.0]);
    assert_eq!(odd.count, 3);
    assert_eq!(odd.min, Some(10.0));
    assert_eq!(odd.max, Some(30.0));
    assert_eq!(odd.mean.unwrap(), 20.0);
    assert_eq!(odd.median.unwrap(), 20.0);
}

#[test]
fn empty_input_has_no_statistics() {
    let s = summarize(&[]);
    assert_eq!(s.count, 0);
    assert_eq!(s.min, None);
    assert_eq!(s.max, None);
    assert_eq!(s.mean, None);
    assert_eq!(s.median, None);
}
