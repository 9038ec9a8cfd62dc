//! GPS segment arithmetic and coverage checks over archive URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filename::parse_basic;
use crate::{Error, Result};

/// A GPS time interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSegment")]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

/// Unchecked wire form; deserialization goes through [`Segment::new`].
#[derive(Deserialize)]
struct RawSegment {
    start: u64,
    end: u64,
}

impl TryFrom<RawSegment> for Segment {
    type Error = Error;

    fn try_from(raw: RawSegment) -> Result<Self> {
        Segment::new(raw.start, raw.end)
    }
}

impl Segment {
    /// Create a segment, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidSegment { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Intersection with `other`, or `None` when they share no time.
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Segment { start, end })
    }
}

impl TryFrom<(u64, u64)> for Segment {
    type Error = Error;

    fn try_from((start, end): (u64, u64)) -> Result<Self> {
        Segment::new(start, end)
    }
}

impl From<Segment> for (u64, u64) {
    fn from(seg: Segment) -> Self {
        (seg.start, seg.end)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Whether two segments overlap.
///
/// One segment overlaps another when its start falls inside the other's
/// `[start, end)`. Segments that only touch end-to-start do not overlap.
pub fn segments_overlap(a: &Segment, b: &Segment) -> bool {
    (a.start <= b.start && b.start < a.end) || (b.start <= a.start && a.start < b.end)
}

/// GPS span declared by a URL's filename.
pub fn url_segment(url: &str) -> Result<Segment> {
    Ok(parse_basic(url)?.span())
}

/// Whether the file behind `url` overlaps `segment`.
pub fn url_overlaps_segment(url: &str, segment: &Segment) -> Result<bool> {
    Ok(segments_overlap(&url_segment(url)?, segment))
}

/// Whether the union of the URLs' spans contiguously covers `target`.
///
/// Input order does not matter. Any gap between consecutive spans, or a
/// union that starts after `target.start` or ends before `target.end`,
/// fails the check. An empty URL list never covers anything.
pub fn full_coverage<S: AsRef<str>>(urls: &[S], target: &Segment) -> Result<bool> {
    let mut spans = urls
        .iter()
        .map(|u| url_segment(u.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    spans.sort();

    let Some(first) = spans.first() else {
        return Ok(false);
    };
    if first.start > target.start {
        return Ok(false);
    }

    let mut covered_to = first.end;
    for span in &spans[1..] {
        if span.start > covered_to {
            return Ok(false);
        }
        covered_to = covered_to.max(span.end);
    }

    Ok(covered_to >= target.end)
}

/// Clip raw segments to `span`, dropping anything left empty, ordered by start.
pub fn clip_segments<I>(segments: I, span: &Segment) -> Vec<Segment>
where
    I: IntoIterator<Item = Segment>,
{
    let mut clipped: Vec<Segment> = segments
        .into_iter()
        .filter_map(|seg| seg.intersection(span))
        .collect();
    clipped.sort();
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u64, end: u64) -> Segment {
        Segment::new(start, end).unwrap()
    }

    #[test]
    fn test_segment_rejects_reversed() {
        assert!(matches!(
            Segment::new(11, 10),
            Err(Error::InvalidSegment { start: 11, end: 10 })
        ));
        assert!(Segment::try_from((10, 10)).unwrap().is_empty());
    }

    #[test]
    fn test_segments_overlap_truth_table() {
        let probe = seg(10, 11);
        assert!(!segments_overlap(&probe, &seg(0, 10)));
        assert!(segments_overlap(&probe, &seg(5, 11)));
        assert!(segments_overlap(&probe, &seg(10, 15)));
        assert!(!segments_overlap(&probe, &seg(11, 15)));
    }

    #[test]
    fn test_url_segment() {
        assert_eq!(url_segment("X-TEST-123-456.ext").unwrap(), seg(123, 579));
        assert!(matches!(url_segment("not-a-file"), Err(Error::Format(_))));
    }

    #[test]
    fn test_url_overlaps_segment() {
        let url = "A-B-10-1.ext";
        assert!(!url_overlaps_segment(url, &seg(0, 10)).unwrap());
        assert!(url_overlaps_segment(url, &seg(5, 11)).unwrap());
        assert!(url_overlaps_segment(url, &seg(10, 15)).unwrap());
        assert!(!url_overlaps_segment(url, &seg(11, 15)).unwrap());
    }

    fn gw150914_files() -> Vec<String> {
        // Two detectors, two rates, two versions; all share one 4096 s span.
        let mut urls = Vec::new();
        for (obs, det) in [("H", "H1"), ("L", "L1")] {
            for rate in [4, 16] {
                for version in [1, 2] {
                    urls.push(format!(
                        "https://losc.ligo.org/s/events/GW150914/{}-{}_LOSC_{}_V{}-1126257414-4096.hdf5",
                        obs, det, rate, version
                    ));
                }
            }
        }
        urls
    }

    #[test]
    fn test_full_coverage_exact_span() {
        let urls = gw150914_files();
        let start = 1126257414;
        assert!(full_coverage(&urls, &seg(start, start + 4096)).unwrap());
        assert!(!full_coverage(&urls, &seg(start - 1, start + 4096)).unwrap());
        assert!(!full_coverage(&urls, &seg(start, start + 4097)).unwrap());
    }

    #[test]
    fn test_full_coverage_unsorted_contiguous() {
        let urls = ["X-A-200-100.gwf", "X-A-0-100.gwf", "X-A-100-100.gwf"];
        assert!(full_coverage(&urls, &seg(50, 250)).unwrap());
    }

    #[test]
    fn test_full_coverage_gap() {
        let urls = ["X-A-0-100.gwf", "X-A-101-100.gwf"];
        assert!(!full_coverage(&urls, &seg(0, 150)).unwrap());
    }

    #[test]
    fn test_full_coverage_nested_span_is_not_a_gap() {
        let urls = ["X-A-0-1000.gwf", "X-A-10-10.gwf", "X-A-1000-100.gwf"];
        assert!(full_coverage(&urls, &seg(0, 1100)).unwrap());
    }

    #[test]
    fn test_full_coverage_empty() {
        let urls: [&str; 0] = [];
        assert!(!full_coverage(&urls, &seg(0, 1)).unwrap());
    }

    #[test]
    fn test_full_coverage_propagates_format_error() {
        let urls = ["X-A-0-100.gwf", "garbage"];
        assert!(matches!(full_coverage(&urls, &seg(0, 1)), Err(Error::Format(_))));
    }

    #[test]
    fn test_clip_segments() {
        let raw = vec![seg(150, 300), seg(0, 50), seg(40, 120), seg(100, 100)];
        let clipped = clip_segments(raw, &seg(100, 200));
        assert_eq!(clipped, vec![seg(100, 120), seg(150, 200)]);
    }

    #[test]
    fn test_deserialize_checks_order() {
        let seg: Segment = serde_json::from_str(r#"{"start":5,"end":10}"#).unwrap();
        assert_eq!(seg.duration(), 5);

        let err = serde_json::from_str::<Segment>(r#"{"start":10,"end":5}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid segment"));
    }

    #[test]
    fn test_duration_of_reversed_literal_is_zero() {
        let seg = Segment { start: 10, end: 5 };
        assert_eq!(seg.duration(), 0);
    }
}
