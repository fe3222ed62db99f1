use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Positions of the columns the loader reads, zero-based.
///
/// Defaults match the Our World in Data `vaccinations.csv` feed:
/// `location, iso_code, date, total_vaccinations, people_vaccinated,
/// people_fully_vaccinated, daily_vaccinations_raw, daily_vaccinations, ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub country_code: usize,
    pub date: usize,
    pub people_fully_vaccinated: usize,
    pub daily_vaccinations: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            country_code: 1,
            date: 2,
            people_fully_vaccinated: 5,
            daily_vaccinations: 7,
        }
    }
}

impl ColumnLayout {
    /// Smallest number of columns a row must have to satisfy this layout.
    pub fn min_width(&self) -> usize {
        [
            self.country_code,
            self.date,
            self.people_fully_vaccinated,
            self.daily_vaccinations,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// One kept row of the raw feed (target country only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub date: NaiveDate,
    pub country_code: String,
    /// Empty in the feed on some days; never treated as zero.
    pub daily_vaccinations: Option<u64>,
    pub people_fully_vaccinated: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub day_offset: i64,
    pub daily_vaccinations: u64,
}

/// Daily vaccination counts keyed by days since the earliest observed date.
///
/// Input order is preserved and duplicate days are kept as-is, so offsets are
/// never negative but need not be sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn days(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.day_offset as f64).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.daily_vaccinations as f64)
            .collect()
    }

    /// Smallest observed day offset, `None` for an empty series.
    pub fn min_day(&self) -> Option<i64> {
        self.points.iter().map(|p| p.day_offset).min()
    }
}

/// Everything the loader extracts for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySeries {
    pub country_code: String,
    pub records: Vec<VaccinationRecord>,
    /// Dates of the rows that contributed to `series`, aligned by index.
    pub dates: Vec<NaiveDate>,
    pub first_date: NaiveDate,
    pub series: TimeSeries,
    /// Maximum cumulative fully-vaccinated figure seen (not the last one).
    pub people_fully_vaccinated_today: u64,
}

/// Ordinary least squares fit of daily vaccinations against day offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Legend text for the fitted line, e.g. `y = 100x + 100`.
    pub fn equation(&self) -> String {
        format!(
            "y = {}x + {}",
            round3(self.slope),
            round3(self.intercept)
        )
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub day: f64,
    pub fully_vaccinated: f64,
}

/// Projected cumulative fully-vaccinated people, one point per sample index `1..N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionCurve {
    pub points: Vec<CurvePoint>,
}

impl ProjectionCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// When the projected count first exceeds the population threshold.
///
/// Both fields are `None` when no crossing happens inside the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub crossover_day: Option<f64>,
    pub crossover_date: Option<NaiveDate>,
}

impl ProjectionResult {
    pub fn not_found() -> Self {
        Self {
            crossover_day: None,
            crossover_date: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.crossover_day.is_some()
    }
}
