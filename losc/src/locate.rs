//! Locate strain-file URLs for events, runs and arbitrary GPS spans.

use log::debug;

use crate::api::{Client, JsonSource};
use crate::schema::UrlRecord;
use crate::segments::{full_coverage, url_overlaps_segment, Segment};
use crate::urls::{match_urls, sieve, MatchOptions, MatchValue};
use crate::{Config, Error, Result};

/// File selection shared by all locate queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlQuery {
    /// File format (`hdf5`, `gwf`, `txt`).
    pub format: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Exact version; latest when unset.
    pub version: Option<u32>,
    /// Release tag, required when a dataset publishes several.
    pub tag: Option<String>,
}

impl Default for UrlQuery {
    fn default() -> Self {
        Self {
            format: "hdf5".to_string(),
            sample_rate: 4096,
            version: None,
            tag: None,
        }
    }
}

impl UrlQuery {
    /// Query using the configured default format and sample rate.
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.format.clone(),
            sample_rate: config.sample_rate,
            ..Self::default()
        }
    }

    fn match_options(&self) -> MatchOptions {
        MatchOptions {
            version: self.version,
            tag: self.tag.clone(),
            ..MatchOptions::default()
        }
    }
}

/// Pick URLs out of a strain listing.
///
/// Records are sieved by format, sample rate and (optionally) detector, kept
/// only if they overlap `span`, then narrowed to a single release.
pub fn select_urls(
    strain: &[UrlRecord],
    detector: Option<&str>,
    span: Option<&Segment>,
    query: &UrlQuery,
) -> Result<Vec<String>> {
    let mut constraints: Vec<(&str, MatchValue)> = vec![
        ("format", query.format.as_str().into()),
        ("sample_rate", query.sample_rate.into()),
    ];
    if let Some(detector) = detector {
        constraints.push(("detector", detector.into()));
    }

    let mut urls = Vec::new();
    for record in sieve(strain, &constraints)? {
        let record = record?;
        if let Some(span) = span {
            if !url_overlaps_segment(&record.url, span)? {
                continue;
            }
        }
        urls.push(record.url.clone());
    }

    match_urls(&urls, &query.match_options())
}

/// URLs for a named event, optionally limited to one detector and a span.
pub fn get_event_urls<S: JsonSource>(
    client: &Client<S>,
    event: &str,
    detector: Option<&str>,
    span: Option<&Segment>,
    query: &UrlQuery,
) -> Result<Vec<String>> {
    let metadata = client.fetch_event_json(event)?;
    select_urls(&metadata.strain, detector, span, query)
}

/// URLs for `detector` within a run over `span`.
pub fn get_run_urls<S: JsonSource>(
    client: &Client<S>,
    run: &str,
    detector: &str,
    span: &Segment,
    query: &UrlQuery,
) -> Result<Vec<String>> {
    let metadata = client.fetch_run_json(run, detector, span.start, span.end)?;
    select_urls(&metadata.strain, Some(detector), Some(span), query)
}

/// URLs for `detector` that fully cover `span`.
///
/// Events inside the span are tried first, then runs from narrowest to
/// widest; the first dataset whose files cover the whole span wins.
pub fn get_urls<S: JsonSource>(
    client: &Client<S>,
    detector: &str,
    span: &Segment,
    query: &UrlQuery,
) -> Result<Vec<String>> {
    let metadata = client.fetch_dataset_json(span.start, span.end)?;

    for event in metadata.events_for(detector) {
        debug!("checking event {} for {} over {}", event, detector, span);
        let urls = get_event_urls(client, event, Some(detector), Some(span), query)?;
        if full_coverage(&urls, span)? {
            return Ok(urls);
        }
    }

    for run in metadata.runs_for(detector, span) {
        debug!("checking run {} for {} over {}", run, detector, span);
        let urls = get_run_urls(client, run, detector, span, query)?;
        if full_coverage(&urls, span)? {
            return Ok(urls);
        }
    }

    Err(Error::NotFound(format!(
        "Cannot find a LOSC dataset for {} covering [{}, {})",
        detector, span.start, span.end
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_HOST;
    use crate::testing::{event_json, gw150914_records, gw170817_records, FakeSource};

    const S6_START: u64 = 934000000;
    const S6_END: u64 = 934100000;

    fn s6_run_json() -> String {
        // 4096 s files from 933998592, contiguous over the whole span.
        let mut strain = Vec::new();
        let mut gps = 933998592;
        while gps < S6_END {
            for version in [1, 2] {
                strain.push(UrlRecord::new(
                    "L1",
                    "hdf5",
                    format!(
                        "https://losc.ligo.org/archive/data/S6/933232640/L-L1_LOSC_4_V{}-{}-4096.hdf5",
                        version, gps
                    ),
                ));
            }
            gps += 4096;
        }
        serde_json::json!({
            "dataset": "S6",
            "GPSstart": S6_START,
            "GPSend": S6_END,
            "strain": strain,
        })
        .to_string()
    }

    fn s6_source() -> FakeSource {
        FakeSource::new()
            .with(
                "https://losc.ligo.org/archive/934000000/934100000/json/",
                r#"{"events": [], "runs": {
                    "tenyear": {"GPSstart": 0, "GPSend": 1500000000, "detectors": ["H1", "L1"]},
                    "S6": {"GPSstart": 931035615, "GPSend": 971622015, "detectors": ["H1", "L1"]}
                }}"#,
            )
            .with(
                "https://losc.ligo.org/archive/links/S6/L1/934000000/934100000/json/",
                &s6_run_json(),
            )
            .with(
                "https://losc.ligo.org/archive/links/tenyear/L1/934000000/934100000/json/",
                r#"{"dataset": "tenyear", "GPSstart": 934000000, "GPSend": 934100000, "strain": []}"#,
            )
    }

    #[test]
    fn test_dataset_listing_for_s6_span() {
        let client = Client::new(s6_source(), DEFAULT_HOST);
        let out = client.fetch_dataset_json(S6_START, S6_END).unwrap();
        assert!(out.events.is_empty());
        let runs: Vec<&str> = out.runs.keys().map(String::as_str).collect();
        assert_eq!(runs, vec!["S6", "tenyear"]);
    }

    #[test]
    fn test_get_urls_covers_span() {
        let client = Client::new(s6_source(), DEFAULT_HOST);
        let span = Segment::new(S6_START, S6_END).unwrap();

        let urls = get_urls(&client, "L1", &span, &UrlQuery::default()).unwrap();
        assert!(!urls.is_empty());
        assert!(full_coverage(&urls, &span).unwrap());
        for url in &urls {
            let name = crate::filename::basename(url);
            assert!(name.starts_with("L-L1"));
            assert!(name.contains("_V2-"));
            assert!(url_overlaps_segment(url, &span).unwrap());
        }
    }

    #[test]
    fn test_get_urls_not_found() {
        let client = Client::new(s6_source(), DEFAULT_HOST);
        let span = Segment::new(S6_START, S6_END).unwrap();

        // Only 4 kHz files are published, so no run can cover the span.
        let query = UrlQuery {
            sample_rate: 16384,
            ..UrlQuery::default()
        };
        let err = get_urls(&client, "L1", &span, &query).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot find a LOSC dataset for L1 covering [934000000, 934100000)"
        );
    }

    #[test]
    fn test_get_event_urls_defaults() {
        let body = event_json("GW150914", 1126259462.4, &gw150914_records());
        let source = FakeSource::new().with("https://losc.ligo.org/archive/GW150914/json/", &body);
        let client = Client::new(source, DEFAULT_HOST);

        let urls = get_event_urls(&client, "GW150914", None, None, &UrlQuery::default()).unwrap();
        assert_eq!(urls.len(), 2);
        for url in &urls {
            assert!(url.ends_with(".hdf5"));
            assert!(url.contains("_4_"));
            assert!(url.contains("_V2-"));
        }

        let query = UrlQuery {
            version: Some(1),
            ..UrlQuery::default()
        };
        let urls = get_event_urls(&client, "GW150914", Some("H1"), None, &query).unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("H-H1_LOSC_4_V1-"));
    }

    #[test]
    fn test_get_event_urls_outside_span_is_empty() {
        let body = event_json("GW150914", 1126259462.4, &gw150914_records());
        let source = FakeSource::new().with("https://losc.ligo.org/archive/GW150914/json/", &body);
        let client = Client::new(source, DEFAULT_HOST);

        let span = Segment::new(0, 1000).unwrap();
        let urls =
            get_event_urls(&client, "GW150914", None, Some(&span), &UrlQuery::default()).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_get_event_urls_requires_tag_when_ambiguous() {
        let body = event_json("GW170817", 1187008882.4, &gw170817_records());
        let source = FakeSource::new().with("https://losc.ligo.org/archive/GW170817/json/", &body);
        let client = Client::new(source, DEFAULT_HOST);

        let err = get_event_urls(&client, "GW170817", None, None, &UrlQuery::default()).unwrap_err();
        assert!(matches!(err, Error::AmbiguousTag(_)));

        let query = UrlQuery {
            tag: Some("CLN".to_string()),
            ..UrlQuery::default()
        };
        let urls = get_event_urls(&client, "GW170817", Some("L1"), None, &query).unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("L-L1_LOSC_CLN_4_V1-"));
    }

    #[test]
    fn test_get_urls_prefers_event_files() {
        let span = Segment::new(1126257414, 1126257414 + 4096).unwrap();
        let body = event_json("GW150914", 1126259462.4, &gw150914_records());
        let source = FakeSource::new()
            .with(
                "https://losc.ligo.org/archive/1126257414/1126261510/json/",
                r#"{"events": {"GW150914": {"detectors": ["H1", "L1"]}},
                    "runs": {"O1": {"detectors": ["H1", "L1"]}}}"#,
            )
            .with("https://losc.ligo.org/archive/GW150914/json/", &body);
        let client = Client::new(&source, DEFAULT_HOST);

        let urls = get_urls(&client, "H1", &span, &UrlQuery::default()).unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("H-H1_LOSC_4_V2-1126257414-4096.hdf5"));
        assert_eq!(source.requests().len(), 2);
    }
}
