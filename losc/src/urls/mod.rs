//! Filtering and version/tag resolution over archive URL lists.
//!
//! # Overview
//!
//! - **Sieve**: lazily keep records whose metadata equals every supplied
//!   constraint. Literal keys (`detector`, `format`, `url`) are read from the
//!   record; derived keys (`tag`, `sample_rate`, `version`, `gps_start`,
//!   `duration`, `observatory`) are decoded from the URL's filename.
//! - **Match**: narrow a URL list to a single data release, preferring the
//!   highest version when none is requested.

mod resolve;
mod sieve;

pub use resolve::{match_urls, MatchOptions};
pub use sieve::{sieve, MatchValue, Sieve, UrlMetadata};
