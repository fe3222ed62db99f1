use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;
use vax_projection::ProjectionResult;
use vax_projection::storage::{LogOutcome, append_projection_log};

fn found(y: i32, m: u32, d: u32) -> ProjectionResult {
    ProjectionResult {
        crossover_day: Some(100.0),
        crossover_date: NaiveDate::from_ymd_opt(y, m, d),
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
}

#[test]
fn missing_log_is_created_with_header_first() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("projections.csv");

    let out = append_projection_log(&log, day(1), &found(2021, 7, 4)).unwrap();
    assert_eq!(out, LogOutcome::Created);

    let txt = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Current Date,Projected Full Vaccination Date",
            "2021-03-01,2021-07-04"
        ]
    );
}

#[test]
fn same_day_rerun_appends_at_most_one_row() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("projections.csv");

    append_projection_log(&log, day(1), &found(2021, 7, 4)).unwrap();
    let again = append_projection_log(&log, day(1), &found(2021, 7, 9)).unwrap();
    assert_eq!(again, LogOutcome::AlreadyLogged);

    let txt = fs::read_to_string(&log).unwrap();
    assert_eq!(txt.lines().count(), 2);
    assert!(!txt.contains("2021-07-09"));
}

#[test]
fn next_day_appends_below_existing_rows() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("projections.csv");

    append_projection_log(&log, day(1), &found(2021, 7, 4)).unwrap();
    let out = append_projection_log(&log, day(2), &ProjectionResult::not_found()).unwrap();
    assert_eq!(out, LogOutcome::Appended);

    // Parse back: the missing crossover is an empty field, not a date.
    let mut rdr = csv::Reader::from_path(&log).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(1), Some("Projected Full Vaccination Date"));
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get(0), Some("2021-03-02"));
    assert_eq!(rows[1].get(1), Some(""));
}

#[test]
fn row_is_not_glued_to_an_unterminated_last_line() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("projections.csv");
    fs::write(
        &log,
        "Current Date,Projected Full Vaccination Date\n2021-03-01,2021-07-04",
    )
    .unwrap();

    let out = append_projection_log(&log, day(2), &ProjectionResult::not_found()).unwrap();
    assert_eq!(out, LogOutcome::Appended);

    let txt = fs::read_to_string(&log).unwrap();
    assert_eq!(
        txt,
        "Current Date,Projected Full Vaccination Date\n2021-03-01,2021-07-04\n2021-03-02,\n"
    );
}
