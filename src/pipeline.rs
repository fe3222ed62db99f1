//! Pipeline entry point: data → trend → projection → report.
//!
//! Every stage returns `Result`; the first error aborts the run, so nothing is
//! plotted or logged when loading or fitting fails.
use crate::api::Fetcher;
use crate::cache::{self, DataStatus, RefreshDecider};
use crate::config::Config;
use crate::error::Result;
use crate::loader;
use crate::models::{CountrySeries, ProjectionResult, TrendLine};
use crate::projection::{self, Projection, ProjectionParams};
use crate::report::{Report, Reporter};
use crate::stats;
use chrono::NaiveDate;

/// Side-effect free outcome of the computation for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub country: CountrySeries,
    pub trend: TrendLine,
    pub projection: Projection,
    pub result: ProjectionResult,
}

/// Everything a full run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub data: DataStatus,
    pub analysis: Analysis,
    pub report: Report,
}

/// Fit and project an already loaded series.
pub fn analyze(config: &Config, country: CountrySeries) -> Result<Analysis> {
    let trend = stats::fit_trend(&country.series.days(), &country.series.values())?;
    log::info!(
        "Fitted daily vaccinations: slope={:.3} intercept={:.3} r2={:.4}",
        trend.slope,
        trend.intercept,
        trend.r_squared
    );

    let min_day = country.series.min_day().unwrap_or(0) as f64;
    let params = ProjectionParams::from_config(
        config,
        min_day,
        country.people_fully_vaccinated_today as f64,
    );
    let projection = projection::project(&trend, &params);
    let result = projection.result(country.first_date)?;

    Ok(Analysis {
        country,
        trend,
        projection,
        result,
    })
}

/// Run the whole projection for `today`.
///
/// `fetcher` supplies the raw feed when it has to be (re)downloaded; `decider`
/// is asked whether an existing data file should be replaced.
pub fn run(
    config: &Config,
    today: NaiveDate,
    fetcher: &dyn Fetcher,
    decider: &mut dyn RefreshDecider,
) -> Result<RunReport> {
    config.validate()?;
    let data = cache::ensure_data_file(config, fetcher, decider)?;
    let country =
        loader::load_country_series(&config.data_path, &config.country_code, &config.columns)?;
    let analysis = analyze(config, country)?;
    let report = Reporter::new(config, today).report(
        &analysis.country,
        &analysis.trend,
        &analysis.projection,
        &analysis.result,
    )?;
    Ok(RunReport {
        data,
        analysis,
        report,
    })
}
