//! Typed shapes of the LOSC archive JSON responses.
//!
//! Only the fields this crate consumes are modelled; anything else in the
//! upstream payload is ignored during decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::segments::Segment;

/// One downloadable file as listed under `strain` in event and run responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Detector prefix, e.g. `H1`.
    pub detector: String,
    /// File format (`hdf5`, `gwf`, `txt`).
    pub format: String,
    pub url: String,
}

impl UrlRecord {
    pub fn new(
        detector: impl Into<String>,
        format: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            detector: detector.into(),
            format: format.into(),
            url: url.into(),
        }
    }
}

/// Summary of an event or run as listed by a dataset query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(rename = "GPSstart", default)]
    pub gps_start: Option<f64>,

    #[serde(rename = "GPSend", default)]
    pub gps_end: Option<f64>,

    /// Detectors with data in this dataset.
    #[serde(default)]
    pub detectors: Vec<String>,
}

impl DatasetInfo {
    /// Whether `detector` recorded data in this dataset.
    pub fn has_detector(&self, detector: &str) -> bool {
        self.detectors.iter().any(|d| d == detector)
    }

    /// GPS extent of the dataset, when the archive reports one.
    pub fn span(&self) -> Option<Segment> {
        let start = self.gps_start?.floor();
        let end = self.gps_end?.ceil();
        if start < 0.0 || end < start {
            return None;
        }
        Some(Segment {
            start: start as u64,
            end: end as u64,
        })
    }
}

/// Events and runs with data inside a GPS span
/// (`/archive/<start>/<end>/json/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetResponse {
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub events: BTreeMap<String, DatasetInfo>,

    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub runs: BTreeMap<String, DatasetInfo>,
}

impl DatasetResponse {
    /// Runs that may hold `detector` data over `span`, narrowest first.
    ///
    /// Runs that list detectors must include `detector`; runs that report an
    /// extent must overlap `span`. Runs without a known extent sort last, so
    /// catch-all releases only win when nothing narrower applies.
    pub fn runs_for(&self, detector: &str, span: &Segment) -> Vec<&str> {
        let mut runs: Vec<(Option<u64>, &str)> = self
            .runs
            .iter()
            .filter(|(_, info)| info.detectors.is_empty() || info.has_detector(detector))
            .filter_map(|(name, info)| match info.span() {
                Some(extent) if extent.intersection(span).is_none() => None,
                Some(extent) => Some((Some(extent.duration()), name.as_str())),
                None => Some((None, name.as_str())),
            })
            .collect();
        runs.sort_by_key(|(duration, name)| (duration.is_none(), *duration, *name));
        runs.into_iter().map(|(_, name)| name).collect()
    }

    /// Events that recorded `detector`, in name order.
    pub fn events_for(&self, detector: &str) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(_, info)| info.detectors.is_empty() || info.has_detector(detector))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Files published for a single event (`/archive/<event>/json/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(rename = "GPS")]
    pub gps: f64,

    pub dataset: String,

    #[serde(default)]
    pub strain: Vec<UrlRecord>,
}

/// Files for one detector within a run
/// (`/archive/links/<run>/<detector>/<start>/<end>/json/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub dataset: String,

    #[serde(rename = "GPSstart")]
    pub gps_start: u64,

    #[serde(rename = "GPSend")]
    pub gps_end: u64,

    #[serde(default)]
    pub strain: Vec<UrlRecord>,
}

/// Raw timeline segments for a flag (`/timeline/segments/json/...`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentResponse {
    #[serde(default)]
    pub segments: Vec<(u64, u64)>,
}

/// The archive encodes an empty mapping as `[]` in some responses.
fn map_or_empty_list<'de, D>(deserializer: D) -> Result<BTreeMap<String, DatasetInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrList {
        Map(BTreeMap<String, DatasetInfo>),
        List(Vec<serde_json::Value>),
    }

    match MapOrList::deserialize(deserializer)? {
        MapOrList::Map(map) => Ok(map),
        MapOrList::List(list) if list.is_empty() => Ok(BTreeMap::new()),
        MapOrList::List(_) => Err(serde::de::Error::custom(
            "expected a mapping of dataset names",
        )),
    }
}
