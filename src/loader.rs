//! CSV ingestion for one country.
//!
//! Columns are read by position (see [`ColumnLayout`]). The first row is a header.
//! Only rows whose country column equals the target are kept; an empty count
//! field is skipped rather than read as zero.
use crate::error::{ProjectionError, Result};
use crate::models::{ColumnLayout, CountrySeries, SeriesPoint, TimeSeries, VaccinationRecord};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load the series for `country` from a CSV file on disk.
pub fn load_country_series<P: AsRef<Path>>(
    path: P,
    country: &str,
    layout: &ColumnLayout,
) -> Result<CountrySeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    parse_country_series(file, country, layout)
}

/// Same as [`load_country_series`] but from any reader.
pub fn parse_country_series<R: Read>(
    reader: R,
    country: &str,
    layout: &ColumnLayout,
) -> Result<CountrySeries> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    if headers.len() < layout.min_width() {
        return Err(ProjectionError::DataFormat(format!(
            "expected at least {} columns, header has {}",
            layout.min_width(),
            headers.len()
        )));
    }

    let mut records: Vec<VaccinationRecord> = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row.map_err(csv_error)?;
        // +2: one for the header, one for 1-based line numbers
        let line = idx + 2;
        if field(&row, layout.country_code, line)? != country {
            continue;
        }
        records.push(parse_record(&row, layout, line)?);
    }

    if records.is_empty() {
        return Err(ProjectionError::EmptySeries {
            country: country.to_string(),
        });
    }

    build_series(country, records)
}

/// Turn the kept records into a day-offset series plus the fully-vaccinated maximum.
fn build_series(country: &str, records: Vec<VaccinationRecord>) -> Result<CountrySeries> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut daily: Vec<u64> = Vec::new();
    let mut fully: Vec<u64> = Vec::new();
    for r in &records {
        if let Some(v) = r.daily_vaccinations {
            dates.push(r.date);
            daily.push(v);
        }
        if let Some(v) = r.people_fully_vaccinated {
            fully.push(v);
        }
    }

    // Offsets count from the earliest date; rows keep their input order.
    let Some(&first_date) = dates.iter().min() else {
        return Err(ProjectionError::EmptySeries {
            country: country.to_string(),
        });
    };

    let points = dates
        .iter()
        .zip(daily)
        .map(|(d, v)| SeriesPoint {
            day_offset: (*d - first_date).num_days(),
            daily_vaccinations: v,
        })
        .collect();

    let people_fully_vaccinated_today = match fully.iter().max() {
        Some(&m) => m,
        None => {
            log::warn!("no people_fully_vaccinated figures for {country}, assuming 0");
            0
        }
    };

    log::debug!(
        "loaded {} rows for {country}, {} daily points from {first_date}",
        records.len(),
        dates.len()
    );

    Ok(CountrySeries {
        country_code: country.to_string(),
        records,
        dates,
        first_date,
        series: TimeSeries { points },
        people_fully_vaccinated_today,
    })
}

fn parse_record(row: &StringRecord, layout: &ColumnLayout, line: usize) -> Result<VaccinationRecord> {
    let date_raw = field(row, layout.date, line)?;
    let date = NaiveDate::parse_from_str(date_raw.trim(), "%Y-%m-%d").map_err(|e| {
        ProjectionError::DataFormat(format!("line {line}: invalid date {date_raw:?}: {e}"))
    })?;
    Ok(VaccinationRecord {
        date,
        country_code: field(row, layout.country_code, line)?.to_string(),
        daily_vaccinations: parse_count(field(row, layout.daily_vaccinations, line)?, line)?,
        people_fully_vaccinated: parse_count(
            field(row, layout.people_fully_vaccinated, line)?,
            line,
        )?,
    })
}

fn field<'r>(row: &'r StringRecord, idx: usize, line: usize) -> Result<&'r str> {
    row.get(idx).ok_or_else(|| {
        ProjectionError::DataFormat(format!("line {line}: missing column {idx}"))
    })
}

/// Parse a non-negative count. Empty means absent. Integral floats such as
/// `"1234.0"` are accepted because the upstream feed emits them on some days.
pub fn parse_count(raw: &str, line: usize) -> Result<Option<u64>> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = s.parse::<u64>() {
        return Ok(Some(v));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(Some(f as u64))
        }
        _ => Err(ProjectionError::DataFormat(format!(
            "line {line}: non-numeric count {raw:?}"
        ))),
    }
}

fn csv_error(e: csv::Error) -> ProjectionError {
    ProjectionError::DataFormat(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_accepts_integral_floats_only() {
        assert_eq!(parse_count("", 1).unwrap(), None);
        assert_eq!(parse_count(" 42 ", 1).unwrap(), Some(42));
        assert_eq!(parse_count("1234.0", 1).unwrap(), Some(1234));
        assert!(parse_count("12.5", 1).is_err());
        assert!(parse_count("-3", 1).is_err());
        assert!(parse_count("n/a", 1).is_err());
    }
}
