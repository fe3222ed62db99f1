//! Run configuration.
//!
//! One `Config` value drives a whole run. `Config::default()` reproduces the
//! reference run (USA, 330 million, 240 days, 1000 samples, two doses). A JSON
//! file may override any subset of fields; the CLI applies its flags on top.
use crate::error::{ProjectionError, Result};
use crate::models::ColumnLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Our World in Data vaccination feed (CC BY 4.0).
pub const DEFAULT_DATA_URL: &str = "https://raw.githubusercontent.com/owid/covid-19-data/master/public/data/vaccinations/vaccinations.csv";

/// Image format for the two projection charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ISO3 code matched against the country column.
    pub country_code: String,
    pub population_threshold: f64,
    /// Legend label of the threshold line on the cumulative chart.
    pub threshold_label: String,
    /// Last day offset (from the first observed date) the projection reaches.
    pub projection_horizon_days: f64,
    pub samples: usize,
    pub doses_per_person: f64,

    pub data_url: String,
    pub data_path: PathBuf,
    /// Refresh an existing data file without asking.
    pub always_refresh: bool,
    pub columns: ColumnLayout,

    pub log_projections: bool,
    pub log_path: PathBuf,

    pub save_figures: bool,
    pub figure_dir: PathBuf,
    pub image_format: ImageFormat,
    pub chart_width: u32,
    pub chart_height: u32,
    pub locale: String,
    /// TTF used for chart text; system locations are searched when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country_code: "USA".into(),
            population_threshold: 330e6,
            threshold_label: "Total US Population (330 million)".into(),
            projection_horizon_days: 240.0,
            samples: 1000,
            doses_per_person: 2.0,
            data_url: DEFAULT_DATA_URL.into(),
            data_path: PathBuf::from("vaccinations.csv"),
            always_refresh: false,
            columns: ColumnLayout::default(),
            log_projections: true,
            log_path: PathBuf::from("projections.csv"),
            save_figures: true,
            figure_dir: PathBuf::from("."),
            image_format: ImageFormat::Png,
            chart_width: 1000,
            chart_height: 600,
            locale: "en".into(),
            font_path: None,
        }
    }
}

impl Config {
    /// Load a (possibly partial) configuration from a JSON file.
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|e| ProjectionError::io(path, e))?;
        let cfg: Config = serde_json::from_str(&txt)
            .map_err(|e| ProjectionError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Reject values the projector cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.country_code.trim().is_empty() {
            return Err(ProjectionError::Config("country code must not be empty".into()));
        }
        if self.samples < 2 {
            return Err(ProjectionError::Config(format!(
                "sample count must be at least 2, got {}",
                self.samples
            )));
        }
        if !(self.doses_per_person.is_finite() && self.doses_per_person > 0.0) {
            return Err(ProjectionError::Config(format!(
                "doses per person must be positive, got {}",
                self.doses_per_person
            )));
        }
        if !self.projection_horizon_days.is_finite() {
            return Err(ProjectionError::Config("projection horizon must be finite".into()));
        }
        if !self.population_threshold.is_finite() {
            return Err(ProjectionError::Config("population threshold must be finite".into()));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ProjectionError::Config("chart size must be non-zero".into()));
        }
        Ok(())
    }
}
