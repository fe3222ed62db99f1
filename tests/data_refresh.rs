use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use vax_projection::cache::{DataStatus, ensure_data_file};
use vax_projection::{Config, Fetcher, KeepExisting, ProjectionError, Result};

/// Writes a fixed body instead of going to the network and counts calls.
struct FakeFetcher {
    body: &'static str,
    calls: Cell<usize>,
}

impl FakeFetcher {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: Cell::new(0),
        }
    }
}

impl Fetcher for FakeFetcher {
    fn fetch_to(&self, _url: &str, dest: &Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        fs::write(dest, self.body).map_err(|e| ProjectionError::io(dest, e))
    }
}

struct FailingFetcher;

impl Fetcher for FailingFetcher {
    fn fetch_to(&self, url: &str, _dest: &Path) -> Result<()> {
        Err(ProjectionError::Fetch(format!("GET {url}: offline")))
    }
}

fn config_in(dir: &Path) -> Config {
    Config {
        data_path: dir.join("vaccinations.csv"),
        ..Config::default()
    }
}

#[test]
fn missing_file_is_downloaded_without_asking() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    let fetcher = FakeFetcher::new("fresh");
    let mut asked = 0;
    let mut decider = |_: &Path| {
        asked += 1;
        true
    };

    let status = ensure_data_file(&cfg, &fetcher, &mut decider).unwrap();
    assert_eq!(status, DataStatus::Downloaded);
    assert_eq!(fetcher.calls.get(), 1);
    assert_eq!(asked, 0);
    assert_eq!(fs::read_to_string(&cfg.data_path).unwrap(), "fresh");
}

#[test]
fn existing_file_is_kept_when_decider_declines() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    fs::write(&cfg.data_path, "cached").unwrap();
    let fetcher = FakeFetcher::new("fresh");

    let status = ensure_data_file(&cfg, &fetcher, &mut KeepExisting).unwrap();
    assert_eq!(status, DataStatus::Cached);
    assert_eq!(fetcher.calls.get(), 0);
    assert_eq!(fs::read_to_string(&cfg.data_path).unwrap(), "cached");
}

#[test]
fn existing_file_is_replaced_when_decider_agrees() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    fs::write(&cfg.data_path, "cached").unwrap();
    let fetcher = FakeFetcher::new("fresh");
    let mut seen = None;
    let mut decider = |p: &Path| {
        seen = Some(p.to_path_buf());
        true
    };

    let status = ensure_data_file(&cfg, &fetcher, &mut decider).unwrap();
    assert_eq!(status, DataStatus::Refreshed);
    assert_eq!(seen.as_deref(), Some(cfg.data_path.as_path()));
    assert_eq!(fs::read_to_string(&cfg.data_path).unwrap(), "fresh");
}

#[test]
fn always_refresh_skips_the_question() {
    let dir = tempdir().unwrap();
    let cfg = Config {
        always_refresh: true,
        ..config_in(dir.path())
    };
    fs::write(&cfg.data_path, "cached").unwrap();
    let fetcher = FakeFetcher::new("fresh");
    let mut decider = |_: &Path| -> bool { panic!("must not be asked") };

    let status = ensure_data_file(&cfg, &fetcher, &mut decider).unwrap();
    assert_eq!(status, DataStatus::Refreshed);
    assert_eq!(fetcher.calls.get(), 1);
}

#[test]
fn fetch_failures_propagate_unchanged() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    let err = ensure_data_file(&cfg, &FailingFetcher, &mut KeepExisting).unwrap_err();
    match err {
        ProjectionError::Fetch(msg) => assert!(msg.contains("offline")),
        other => panic!("unexpected error: {other:?}"),
    }
}
