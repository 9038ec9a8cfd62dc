//! Resolve a URL list to a single data release.

use std::collections::BTreeSet;

use crate::filename::{basename, parse_resolved, FileName, Release};
use crate::{Error, Result};

/// Constraints for [`match_urls`]. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Exact version; when unset the highest available version is chosen.
    pub version: Option<u32>,
    /// Release tag such as `CLN`.
    pub tag: Option<String>,
    /// Sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// File format (`hdf5`, `gwf`, `txt`).
    pub format: Option<String>,
}

impl MatchOptions {
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    fn accepts(&self, file: &FileName, release: &Release) -> bool {
        self.tag
            .as_ref()
            .map_or(true, |tag| release.tag.as_ref() == Some(tag))
            && self
                .sample_rate
                .map_or(true, |rate| release.sample_rate == rate)
            && self
                .format
                .as_deref()
                .map_or(true, |format| file.format() == Some(format))
    }
}

/// Narrow `urls` to the files of one data release.
///
/// Explicit tag, sample rate and format constraints filter first. With an
/// explicit version only that version is returned. Otherwise the remaining
/// files must share a single tag (or [`Error::AmbiguousTag`] is raised) and
/// the highest version among them is returned. Input order is preserved.
///
/// Every URL must carry release information in its filename; anything else
/// is a [`Error::Format`].
pub fn match_urls<S: AsRef<str>>(urls: &[S], opts: &MatchOptions) -> Result<Vec<String>> {
    let mut candidates: Vec<(&str, Release)> = Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.as_ref();
        let resolved = parse_resolved(url)?;
        let release = resolved.release.ok_or_else(|| {
            Error::Format(format!("{:?}: not a LOSC strain filename", basename(url)))
        })?;
        if opts.accepts(&resolved.file, &release) {
            candidates.push((url, release));
        }
    }

    if let Some(version) = opts.version {
        return Ok(select_version(&candidates, version));
    }

    if opts.tag.is_none() {
        let tags: BTreeSet<&Option<String>> = candidates.iter().map(|(_, r)| &r.tag).collect();
        if tags.len() > 1 {
            return Err(Error::AmbiguousTag(tags.into_iter().cloned().collect()));
        }
    }

    match candidates.iter().map(|(_, r)| r.version).max() {
        Some(latest) => Ok(select_version(&candidates, latest)),
        None => Ok(Vec::new()),
    }
}

fn select_version(candidates: &[(&str, Release)], version: u32) -> Vec<String> {
    candidates
        .iter()
        .filter(|(_, r)| r.version == version)
        .map(|(url, _)| url.to_string())
        .collect()
}
