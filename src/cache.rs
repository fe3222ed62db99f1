//! Local cache of the raw feed and the refresh decision.
use crate::api::Fetcher;
use crate::config::Config;
use crate::error::{ProjectionError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Answers "should the existing data file be replaced by fresh data?".
///
/// The CLI implements this with a terminal prompt; library callers and tests
/// inject a fixed answer or a closure.
pub trait RefreshDecider {
    fn should_refresh(&mut self, path: &Path) -> bool;
}

impl<F> RefreshDecider for F
where
    F: FnMut(&Path) -> bool,
{
    fn should_refresh(&mut self, path: &Path) -> bool {
        self(path)
    }
}

/// Always replace an existing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRefresh;

impl RefreshDecider for AlwaysRefresh {
    fn should_refresh(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Never replace an existing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepExisting;

impl RefreshDecider for KeepExisting {
    fn should_refresh(&mut self, _path: &Path) -> bool {
        false
    }
}

/// What `ensure_data_file` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// No file existed; it was downloaded.
    Downloaded,
    /// An existing file was replaced.
    Refreshed,
    /// The existing file is used as-is.
    Cached,
}

/// Make sure `config.data_path` holds the raw feed.
///
/// - missing file: download it
/// - existing file: refresh when `always_refresh` is set, otherwise ask `decider`
///
/// A `NotFound` while removing the old file (someone deleted it meanwhile) is
/// only a warning; the download still happens.
pub fn ensure_data_file(
    config: &Config,
    fetcher: &dyn Fetcher,
    decider: &mut dyn RefreshDecider,
) -> Result<DataStatus> {
    let path = config.data_path.as_path();

    if !path.exists() {
        log::info!("No existing data at {}, downloading", path.display());
        fetcher.fetch_to(&config.data_url, path)?;
        return Ok(DataStatus::Downloaded);
    }

    let refresh = config.always_refresh || decider.should_refresh(path);
    if !refresh {
        log::info!("Using cached data at {}", path.display());
        return Ok(DataStatus::Cached);
    }

    match std::fs::remove_file(path) {
        Ok(()) => log::info!("Removed existing file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => log::warn!(
            "{} vanished before it could be removed; continuing as if it did not exist",
            path.display()
        ),
        Err(e) => return Err(ProjectionError::io(path, e)),
    }
    log::info!("Downloading new data to {}", path.display());
    fetcher.fetch_to(&config.data_url, path)?;
    Ok(DataStatus::Refreshed)
}
