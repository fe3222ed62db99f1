//! Public types for the visualization module.

use crate::config::{Config, ImageFormat};
use chrono::NaiveDate;
use std::path::PathBuf;

/// The two charts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Observed daily vaccinations with the fitted trend line.
    DailyRate,
    /// Projected cumulative fully vaccinated people against the threshold.
    Cumulative,
}

impl ChartKind {
    /// File name prefix, completed by the run date.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ChartKind::DailyRate => "Projected daily vaccinations",
            ChartKind::Cumulative => "Projected total vaccinations",
        }
    }

    /// `"<prefix> <YYYY-MM-DD>.<ext>"`
    pub fn file_name(&self, date: NaiveDate, format: ImageFormat) -> String {
        format!("{} {}.{}", self.file_prefix(), date, format.extension())
    }
}

/// Size, caption and label locale shared by both charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub locale: String,
    pub font_path: Option<PathBuf>,
}

impl ChartOptions {
    /// Options from the run configuration; the caption is the run date.
    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            width: config.chart_width,
            height: config.chart_height,
            title: today.to_string(),
            locale: config.locale.clone(),
            font_path: config.font_path.clone(),
        }
    }
}
