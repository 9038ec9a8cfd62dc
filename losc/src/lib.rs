//! LOSC: LIGO Open Science Center data locator
//!
//! Resolves archive metadata into filtered, deduplicated download URLs and
//! answers data-quality segment queries.

pub mod api;
pub mod config;
pub mod error;
pub mod filename;
pub mod locate;
pub mod schema;
pub mod segments;
pub mod timeline;
pub mod urls;

#[cfg(test)]
mod testing;

pub use api::{Client, HttpSource, JsonSource, DEFAULT_HOST};
pub use config::Config;
pub use error::{Error, Result};
pub use filename::{parse_basic, parse_resolved, FileName, Release, ResolvedName};
pub use locate::{get_event_urls, get_run_urls, get_urls, select_urls, UrlQuery};
pub use schema::{DatasetInfo, DatasetResponse, EventResponse, RunResponse, SegmentResponse, UrlRecord};
pub use segments::{full_coverage, segments_overlap, url_overlaps_segment, url_segment, Segment};
pub use timeline::{get_segments, RunTimeline, SegmentSource};
pub use urls::{match_urls, sieve, MatchOptions, MatchValue, Sieve, UrlMetadata};
