//! Blocking download client for the raw vaccination feed.
//!
//! The feed is a single CSV file served over HTTPS. `Client::fetch_to` streams it
//! into a temp file next to the destination and then persists it in place, so a
//! failed download never leaves a truncated cache behind.
//!
//! ### Notes
//! - Transient failures (HTTP 5xx, transport errors) are retried with a short
//!   backoff (100/300/700 ms). Other HTTP errors fail immediately.
//! - Network timeouts use a sane default (30s total, 10s connect).
//!
//! Typical usage:
//! ```no_run
//! # use vax_projection::api::{Client, Fetcher};
//! # use vax_projection::config::DEFAULT_DATA_URL;
//! let client = Client::new()?;
//! client.fetch_to(DEFAULT_DATA_URL, std::path::Path::new("vaccinations.csv"))?;
//! # Ok::<(), vax_projection::ProjectionError>(())
//! ```
use crate::error::{ProjectionError, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::path::Path;
use std::time::Duration;

/// Something that can place the raw feed at `dest`.
///
/// The pipeline only talks to this trait, so tests can stand in a local file.
pub trait Fetcher {
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("vax_projection/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProjectionError::Fetch(format!("http client build: {e}")))?;
        Ok(Self { http })
    }

    fn get_with_retry(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let mut last_err: Option<String> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => return Ok(r),
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(format!("HTTP {}", r.status()));
                }
                Ok(r) => {
                    return Err(ProjectionError::Fetch(format!(
                        "GET {url}: request failed with HTTP {}",
                        r.status()
                    )));
                }
                Err(e) => last_err = Some(e.to_string()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(ProjectionError::Fetch(format!(
            "GET {url}: network error: {}",
            last_err.unwrap_or_default()
        )))
    }
}

impl Fetcher for Client {
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<()> {
        let mut resp = self.get_with_retry(url)?;

        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ProjectionError::io(dir, e))?;
        let bytes = resp
            .copy_to(tmp.as_file_mut())
            .map_err(|e| ProjectionError::Fetch(format!("GET {url}: reading body: {e}")))?;
        tmp.persist(dest)
            .map_err(|e| ProjectionError::io(dest, e.error))?;

        log::info!("downloaded {bytes} bytes from {url} to {}", dest.display());
        Ok(())
    }
}
