//! Remote access to the LOSC archive JSON API.
//!
//! Raw transport sits behind [`JsonSource`] so the archive URL layout and
//! response decoding can be exercised without a network.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use crate::schema::{DatasetResponse, EventResponse, RunResponse, SegmentResponse};
use crate::{Config, Error, Result};

/// Default archive host.
pub const DEFAULT_HOST: &str = "https://losc.ligo.org";

/// Fetches the raw body behind a URL.
pub trait JsonSource {
    fn get(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP transport.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("losc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl JsonSource for HttpSource {
    fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

/// Typed client for the archive API.
pub struct Client<S = HttpSource> {
    source: S,
    host: String,
}

impl Client<HttpSource> {
    /// Create an HTTP client for the configured host.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(HttpSource::new(config)?, &config.host))
    }
}

impl<S: JsonSource> Client<S> {
    pub fn new(source: S, host: impl Into<String>) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self { source, host }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch `url` and decode its body as `T`.
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.source.get(url)?;
        serde_json::from_str(&body).map_err(|source| Error::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Events and runs with data in `[start, end)`.
    pub fn fetch_dataset_json(&self, start: u64, end: u64) -> Result<DatasetResponse> {
        let url = format!("{}/archive/{}/{}/json/", self.host, start, end);
        self.fetch_json(&url)
    }

    /// Metadata and files for a named event.
    pub fn fetch_event_json(&self, event: &str) -> Result<EventResponse> {
        let url = format!("{}/archive/{}/json/", self.host, event);
        self.fetch_json(&url)
    }

    /// Files for `detector` within `run` over `[start, end)`.
    pub fn fetch_run_json(
        &self,
        run: &str,
        detector: &str,
        start: u64,
        end: u64,
    ) -> Result<RunResponse> {
        let url = format!(
            "{}/archive/links/{}/{}/{}/{}/json/",
            self.host, run, detector, start, end
        );
        self.fetch_json(&url)
    }

    /// Raw timeline segments for `flag` within `dataset` over `[start, end)`.
    pub fn fetch_segments_json(
        &self,
        dataset: &str,
        flag: &str,
        start: u64,
        end: u64,
    ) -> Result<SegmentResponse> {
        let url = format!(
            "{}/timeline/segments/json/{}/{}/{}/{}/",
            self.host,
            dataset,
            flag,
            start,
            end.saturating_sub(start)
        );
        self.fetch_json(&url)
    }
}
