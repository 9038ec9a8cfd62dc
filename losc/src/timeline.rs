//! Data-quality timeline segments.
//!
//! A flag such as `H1_DATA` names a boolean data-quality condition of one
//! detector. The archive's segment database reports where the flag was
//! active; this module clips those intervals to the requested span.

use log::debug;

use crate::api::{Client, JsonSource};
use crate::segments::{clip_segments, Segment};
use crate::{Error, Result};

/// Segment database returning the raw active intervals of a flag.
///
/// Implementations may return intervals extending past `span`; they are
/// expected to be disjoint.
pub trait SegmentSource {
    fn raw_segments(&self, flag: &str, span: &Segment) -> Result<Vec<Segment>>;
}

/// Detector prefix of a flag name (`H1_DATA` -> `H1`).
pub fn flag_detector(flag: &str) -> Result<&str> {
    match flag.split_once('_') {
        Some((detector, name)) if !detector.is_empty() && !name.is_empty() => Ok(detector),
        _ => Err(Error::InvalidFlag(flag.to_string())),
    }
}

fn to_segments(raw: Vec<(u64, u64)>) -> Result<Vec<Segment>> {
    raw.into_iter().map(Segment::try_from).collect()
}

/// Query the timeline of one named run.
pub struct RunTimeline<'a, S> {
    client: &'a Client<S>,
    run: String,
}

impl<'a, S: JsonSource> RunTimeline<'a, S> {
    pub fn new(client: &'a Client<S>, run: impl Into<String>) -> Self {
        Self {
            client,
            run: run.into(),
        }
    }
}

impl<S: JsonSource> SegmentSource for RunTimeline<'_, S> {
    fn raw_segments(&self, flag: &str, span: &Segment) -> Result<Vec<Segment>> {
        flag_detector(flag)?;
        let response = self
            .client
            .fetch_segments_json(&self.run, flag, span.start, span.end)?;
        to_segments(response.segments)
    }
}

/// Picks the narrowest run recording the flag's detector, then queries it.
impl<S: JsonSource> SegmentSource for Client<S> {
    fn raw_segments(&self, flag: &str, span: &Segment) -> Result<Vec<Segment>> {
        let detector = flag_detector(flag)?;
        let datasets = self.fetch_dataset_json(span.start, span.end)?;
        let run = datasets
            .runs_for(detector, span)
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Cannot find a LOSC run with {} data covering [{}, {})",
                    detector, span.start, span.end
                ))
            })?;
        debug!("querying {} segments from run {}", flag, run);
        RunTimeline::new(self, run).raw_segments(flag, span)
    }
}

/// Segments within `[start, end)` where `flag` was active.
///
/// Results are clipped to the span, empty intervals are dropped, and the
/// remainder is sorted by start time.
pub fn get_segments<S>(source: &S, flag: &str, start: u64, end: u64) -> Result<Vec<Segment>>
where
    S: SegmentSource + ?Sized,
{
    let span = Segment::new(start, end)?;
    let raw = source.raw_segments(flag, &span)?;
    Ok(clip_segments(raw, &span))
}
