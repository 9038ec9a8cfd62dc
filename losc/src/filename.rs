//! Structured filename codec for LOSC archive files.
//!
//! Every archive file is named `<OBS>-<DESCRIPTION>-<GPSSTART>-<DURATION>.<ext>`,
//! for example `H-H1_LOSC_4_V1-1126259446-32.hdf5`. Strain files published
//! through the archive additionally encode their provenance in the
//! description field as `<DET>_LOSC_[<TAG>_]<RATE>_V<VERSION>`, where the
//! rate is given in kHz.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::segments::Segment;
use crate::{Error, Result};

/// Description field of a resolved strain file, e.g. `H1_LOSC_CLN_4_V1`.
static RELEASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A(?P<det>[A-Z][0-9])_(?P<kind>LOSC|GWOSC)_(?:(?P<tag>.+)_)?(?P<rate>\d+)(?:KHZ)?_V(?P<version>\d+)\z",
    )
    .expect("release pattern is valid")
});

/// Samples per second in one "kHz" of a LOSC filename.
const HZ_PER_KHZ: u32 = 1024;

/// A parsed archive filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    /// Single-letter observatory code (`H`, `L`, `V`, ...).
    pub observatory: String,
    /// Free-form description field between the observatory and the GPS start.
    pub description: String,
    pub gps_start: u64,
    pub duration: u64,
    /// Everything after the first `.` of the last field (`hdf5`, `txt.gz`).
    pub extension: Option<String>,
}

/// Provenance decoded from the description field of a resolved strain file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Detector prefix, e.g. `H1`.
    pub detector: String,
    /// Data product kind (`LOSC` or `GWOSC`).
    pub kind: String,
    /// Optional release tag such as `CLN`.
    pub tag: Option<String>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    pub version: u32,
}

/// A filename together with its release information, when it has any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub file: FileName,
    /// `None` when the description does not follow the strain-file convention.
    pub release: Option<Release>,
}

impl FileName {
    /// GPS end time (`gps_start + duration`).
    pub fn gps_end(&self) -> u64 {
        self.gps_start + self.duration
    }

    /// Time span covered by this file.
    pub fn span(&self) -> Segment {
        Segment {
            start: self.gps_start,
            end: self.gps_end(),
        }
    }

    /// File format named by the extension (`txt` for `txt.gz`).
    pub fn format(&self) -> Option<&str> {
        self.extension.as_deref().and_then(|ext| ext.split('.').next())
    }

    /// Decode the description field as a strain-file release.
    pub fn release(&self) -> Option<Release> {
        let caps = RELEASE_RE.captures(&self.description)?;
        let khz: u32 = caps["rate"].parse().ok()?;
        Some(Release {
            detector: caps["det"].to_string(),
            kind: caps["kind"].to_string(),
            tag: caps.name("tag").map(|m| m.as_str().to_string()),
            sample_rate: khz.checked_mul(HZ_PER_KHZ)?,
            version: caps["version"].parse().ok()?,
        })
    }
}

impl Release {
    /// Encode this release as a filename description field.
    pub fn description(&self) -> String {
        let khz = self.sample_rate / HZ_PER_KHZ;
        match &self.tag {
            Some(tag) => format!("{}_{}_{}_{}_V{}", self.detector, self.kind, tag, khz, self.version),
            None => format!("{}_{}_{}_V{}", self.detector, self.kind, khz, self.version),
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.observatory, self.description, self.gps_start, self.duration
        )?;
        if let Some(ext) = &self.extension {
            write!(f, ".{}", ext)?;
        }
        Ok(())
    }
}

/// Strip any directory or URL prefix, leaving the final path component.
pub fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Parse the generic `<OBS>-<DESCRIPTION>-<GPSSTART>-<DURATION>.<ext>` grammar.
///
/// Accepts a bare filename or a full URL.
pub fn parse_basic(url: &str) -> Result<FileName> {
    let name = basename(url);
    let bad = |reason: &str| Error::Format(format!("{:?}: {}", name, reason));

    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() != 4 {
        return Err(bad("expected <OBS>-<DESCRIPTION>-<GPSSTART>-<DURATION>.<ext>"));
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        return Err(bad("empty observatory or description"));
    }

    let (duration, extension) = match parts[3].split_once('.') {
        Some((dur, ext)) => (dur, Some(ext.to_string())),
        None => (parts[3], None),
    };

    let gps_start: u64 = parts[2]
        .parse()
        .map_err(|_| bad("GPS start is not a non-negative integer"))?;
    let duration: u64 = duration
        .parse()
        .map_err(|_| bad("duration is not a non-negative integer"))?;
    if gps_start.checked_add(duration).is_none() {
        return Err(bad("GPS end overflows"));
    }

    Ok(FileName {
        observatory: parts[0].to_string(),
        description: parts[1].to_string(),
        gps_start,
        duration,
        extension,
    })
}

/// Parse a filename and decode its release information where present.
pub fn parse_resolved(url: &str) -> Result<ResolvedName> {
    let file = parse_basic(url)?;
    let release = file.release();
    Ok(ResolvedName { file, release })
}
