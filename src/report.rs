//! Final stage: charts, console message and the projection log.
use crate::config::Config;
use crate::error::{ProjectionError, Result};
use crate::models::{CountrySeries, ProjectionResult, TrendLine};
use crate::projection::Projection;
use crate::storage::{self, LogOutcome};
use crate::viz::{self, ChartKind, ChartOptions};
use chrono::NaiveDate;
use std::path::PathBuf;

/// The one-line verdict of a run.
///
/// ```
/// # use chrono::NaiveDate;
/// # use vax_projection::models::ProjectionResult;
/// # use vax_projection::report::projection_message;
/// let result = ProjectionResult {
///     crossover_day: Some(200.4),
///     crossover_date: NaiveDate::from_ymd_opt(2021, 7, 31),
/// };
/// assert_eq!(
///     projection_message("USA", 240.0, &result),
///     "This projects all of USA may be vaccinated by July 31, 2021"
/// );
/// ```
pub fn projection_message(country: &str, horizon_days: f64, result: &ProjectionResult) -> String {
    match result.crossover_date {
        Some(date) => format!(
            "This projects all of {country} may be vaccinated by {}",
            date.format("%B %d, %Y")
        ),
        None => format!(
            "This projects not all of {country} will be vaccinated within the {horizon_days:.0}-day horizon"
        ),
    }
}

/// Paths and outcomes produced by [`Reporter::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub message: String,
    pub charts: Vec<PathBuf>,
    pub log: Option<LogOutcome>,
}

/// Renders charts and appends the log for one run date.
#[derive(Debug, Clone)]
pub struct Reporter<'a> {
    config: &'a Config,
    today: NaiveDate,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a Config, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// Where a chart of `kind` is written for this run.
    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.config
            .figure_dir
            .join(kind.file_name(self.today, self.config.image_format))
    }

    pub fn report(
        &self,
        country: &CountrySeries,
        trend: &TrendLine,
        projection: &Projection,
        result: &ProjectionResult,
    ) -> Result<Report> {
        let charts = if self.config.save_figures {
            self.write_charts(country, trend, projection)?
        } else {
            Vec::new()
        };

        let message = projection_message(
            &self.config.country_code,
            self.config.projection_horizon_days,
            result,
        );

        let log = if self.config.log_projections {
            Some(storage::append_projection_log(
                &self.config.log_path,
                self.today,
                result,
            )?)
        } else {
            None
        };

        Ok(Report { message, charts, log })
    }

    fn write_charts(
        &self,
        country: &CountrySeries,
        trend: &TrendLine,
        projection: &Projection,
    ) -> Result<Vec<PathBuf>> {
        let dir = &self.config.figure_dir;
        std::fs::create_dir_all(dir).map_err(|e| ProjectionError::io(dir, e))?;

        let opts = ChartOptions::from_config(self.config, self.today);
        let x_desc = format!("Days since {}", country.first_date);

        let daily = self.chart_path(ChartKind::DailyRate);
        viz::plot_daily_rate(&country.series, trend, projection, &x_desc, &daily, &opts)?;

        let total = self.chart_path(ChartKind::Cumulative);
        viz::plot_cumulative(
            &projection.curve,
            self.config.population_threshold,
            &self.config.threshold_label,
            &x_desc,
            &total,
            &opts,
        )?;

        Ok(vec![daily, total])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_crossing_message_shows_whole_days() {
        let msg = projection_message("USA", 90.4, &ProjectionResult::not_found());
        assert_eq!(
            msg,
            "This projects not all of USA will be vaccinated within the 90-day horizon"
        );
    }
}
