use crate::error::{ProjectionError, Result};
use crate::models::{ProjectionCurve, ProjectionResult};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Header row of the projection log.
pub const LOG_HEADER: [&str; 2] = ["Current Date", "Projected Full Vaccination Date"];

/// What `append_projection_log` did to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// The log did not exist (or was empty); header and row were written.
    Created,
    /// A row for today was appended.
    Appended,
    /// The last row is already dated today; nothing was written.
    AlreadyLogged,
}

/// Append `[today, crossover date]` to the projection log, once per day.
///
/// A missing crossover is recorded as an empty field.
pub fn append_projection_log<P: AsRef<Path>>(
    path: P,
    today: NaiveDate,
    result: &ProjectionResult,
) -> Result<LogOutcome> {
    let path = path.as_ref();
    let today_s = today.to_string();

    let needs_header = match last_row_date(path)? {
        None => true,
        Some(last) if last == today_s => {
            log::info!("Data from today already exists in {}, not adding to log", path.display());
            return Ok(LogOutcome::AlreadyLogged);
        }
        Some(_) => false,
    };

    let unterminated = !needs_header && !ends_with_newline(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ProjectionError::io(path, e))?;
    if unterminated {
        log::warn!("{} does not end with a newline, terminating its last row", path.display());
        file.write_all(b"\n")
            .map_err(|e| ProjectionError::io(path, e))?;
    }
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        log::info!("Log not found at {}, creating it", path.display());
        wtr.write_record(LOG_HEADER).map_err(|e| csv_io(path, e))?;
    }
    let date_s = result
        .crossover_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    wtr.write_record([today_s.as_str(), date_s.as_str()])
        .map_err(|e| csv_io(path, e))?;
    wtr.flush().map_err(|e| ProjectionError::io(path, e))?;

    log::info!("Appended projection for {today_s} to {}", path.display());
    Ok(if needs_header {
        LogOutcome::Created
    } else {
        LogOutcome::Appended
    })
}

/// First field of the last row, `None` when the file is missing or has no rows.
fn last_row_date(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_io(path, e))?;
    let mut last: Option<String> = None;
    for row in rdr.records() {
        let row = row.map_err(|e| csv_io(path, e))?;
        last = Some(row.get(0).unwrap_or_default().to_string());
    }
    Ok(last)
}

/// Whether the last byte of an existing, non-empty file is `\n`.
fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut f = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let len = f.metadata().map_err(|e| ProjectionError::io(path, e))?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    f.seek(SeekFrom::End(-1))
        .and_then(|_| f.read_exact(&mut last))
        .map_err(|e| ProjectionError::io(path, e))?;
    Ok(last[0] == b'\n')
}

fn csv_io(path: &Path, e: csv::Error) -> ProjectionError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => ProjectionError::io(path, io),
            other => ProjectionError::DataFormat(format!("{}: {:?}", path.display(), other)),
        }
    } else {
        ProjectionError::DataFormat(format!("{}: {}", path.display(), e))
    }
}

/// Save the projection curve as CSV with header `day,fully_vaccinated`.
pub fn save_curve_csv<P: AsRef<Path>>(curve: &ProjectionCurve, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| csv_io(path, e))?;
    wtr.write_record(["day", "fully_vaccinated"])
        .map_err(|e| csv_io(path, e))?;
    for p in &curve.points {
        wtr.serialize((p.day, p.fully_vaccinated))
            .map_err(|e| csv_io(path, e))?;
    }
    wtr.flush().map_err(|e| ProjectionError::io(path, e))?;
    Ok(())
}

/// Save the projection curve as a pretty JSON array.
pub fn save_curve_json<P: AsRef<Path>>(curve: &ProjectionCurve, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).map_err(|e| ProjectionError::io(path, e))?;
    let s = serde_json::to_string_pretty(&curve.points)
        .map_err(|e| ProjectionError::DataFormat(e.to_string()))?;
    f.write_all(s.as_bytes())
        .map_err(|e| ProjectionError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurvePoint;
    use tempfile::tempdir;

    #[test]
    fn write_curve_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("curve.csv");
        let jsonp = dir.path().join("curve.json");
        let curve = ProjectionCurve {
            points: vec![
                CurvePoint { day: 0.5, fully_vaccinated: 10.0 },
                CurvePoint { day: 1.0, fully_vaccinated: 20.0 },
            ],
        };
        save_curve_csv(&curve, &csvp).unwrap();
        save_curve_json(&curve, &jsonp).unwrap();
        let txt = std::fs::read_to_string(&csvp).unwrap();
        assert!(txt.starts_with("day,fully_vaccinated"));
        assert_eq!(txt.lines().count(), 3);
        assert!(jsonp.exists());
    }

    #[test]
    fn empty_log_file_gets_a_header() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("projections.csv");
        std::fs::write(&log, "").unwrap();
        let today = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let out = append_projection_log(&log, today, &ProjectionResult::not_found()).unwrap();
        assert_eq!(out, LogOutcome::Created);
        let txt = std::fs::read_to_string(&log).unwrap();
        assert_eq!(
            txt.lines().collect::<Vec<_>>(),
            vec!["Current Date,Projected Full Vaccination Date", "2021-03-01,"]
        );
    }
}
