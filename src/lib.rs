//! vax_projection
//!
//! A small Rust library for projecting when a country's population could be fully
//! vaccinated against COVID-19, from the Our World in Data daily vaccination feed.
//! Pairs with the `vaxproj` CLI.
//!
//! The model is deliberately naive: a straight line through daily vaccinations,
//! integrated forward and halved for a two-dose regimen. It is not a forecast.
//!
//! ### Features
//! - Download and cache the raw CSV feed, refresh on demand
//! - Extract one country's daily series and fully-vaccinated count
//! - Ordinary least squares trend with r²
//! - Simpson integration of the trend and threshold crossing date
//! - PNG/SVG charts and an append-only, once-per-day projection log
//!
//! ### Example
//! ```no_run
//! use vax_projection::{Config, KeepExisting, api::Client, pipeline};
//!
//! let config = Config::default();
//! let today = chrono::Local::now().date_naive();
//! let run = pipeline::run(&config, today, &Client::new()?, &mut KeepExisting)?;
//! println!("{}", run.report.message);
//! # Ok::<(), vax_projection::ProjectionError>(())
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod report;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::{Client, Fetcher};
pub use cache::{AlwaysRefresh, KeepExisting, RefreshDecider};
pub use config::Config;
pub use error::{ProjectionError, Result};
pub use models::{CountrySeries, ProjectionCurve, ProjectionResult, TimeSeries, TrendLine};
