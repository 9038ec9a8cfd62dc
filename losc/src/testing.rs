//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::api::JsonSource;
use crate::schema::UrlRecord;
use crate::{Error, Result};

/// Canned-response transport.
#[derive(Default)]
pub struct FakeSource {
    bodies: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl JsonSource for FakeSource {
    fn get(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no canned response for {}", url)))
    }
}

impl JsonSource for &FakeSource {
    fn get(&self, url: &str) -> Result<String> {
        (**self).get(url)
    }
}

/// GW150914: H1/L1 x 4/16 kHz x V1/V2 x hdf5/gwf/txt, all over one 4096 s span.
pub fn gw150914_records() -> Vec<UrlRecord> {
    let mut records = Vec::new();
    for (obs, det) in [("H", "H1"), ("L", "L1")] {
        for khz in [4, 16] {
            for version in [1, 2] {
                for (format, ext) in [("hdf5", "hdf5"), ("gwf", "gwf"), ("txt", "txt.gz")] {
                    let url = format!(
                        "https://losc.ligo.org/s/events/GW150914/{}-{}_LOSC_{}_V{}-1126257414-4096.{}",
                        obs, det, khz, version, ext
                    );
                    records.push(UrlRecord::new(det, format, url));
                }
            }
        }
    }
    records
}

/// GW170817: H1/L1/V1 at 4 kHz, V1, with both untagged and `CLN` releases.
pub fn gw170817_records() -> Vec<UrlRecord> {
    let mut records = Vec::new();
    for (obs, det) in [("H", "H1"), ("L", "L1"), ("V", "V1")] {
        for tag in ["", "CLN_"] {
            let url = format!(
                "https://losc.ligo.org/s/events/GW170817/{}-{}_LOSC_{}4_V1-1187006835-4096.hdf5",
                obs, det, tag
            );
            records.push(UrlRecord::new(det, "hdf5", url));
        }
    }
    records
}

/// The `url` field of every record.
pub fn urls_of(records: &[UrlRecord]) -> Vec<String> {
    records.iter().map(|r| r.url.clone()).collect()
}

/// JSON body for an event response carrying `records`.
pub fn event_json(event: &str, gps: f64, records: &[UrlRecord]) -> String {
    serde_json::json!({
        "GPS": gps,
        "dataset": event,
        "strain": records,
    })
    .to_string()
}
