//! Lazy attribute sieve over URL metadata records.

use std::fmt;

use crate::filename::{parse_resolved, ResolvedName};
use crate::schema::UrlRecord;
use crate::{Error, Result};

/// Read access to the literal fields of a URL record.
pub trait UrlMetadata {
    fn detector(&self) -> &str;
    fn format(&self) -> &str;
    fn url(&self) -> &str;
}

impl UrlMetadata for UrlRecord {
    fn detector(&self) -> &str {
        &self.detector
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl<T: UrlMetadata + ?Sized> UrlMetadata for &T {
    fn detector(&self) -> &str {
        (**self).detector()
    }

    fn format(&self) -> &str {
        (**self).format()
    }

    fn url(&self) -> &str {
        (**self).url()
    }
}

/// A constraint value. Comparison is exact: `Int(4096)` never equals
/// `Text("4096")`, and text comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchValue {
    /// Absent, e.g. the tag of an untagged file.
    Null,
    Int(u64),
    Text(String),
}

impl MatchValue {
    fn is_text(&self, s: &str) -> bool {
        matches!(self, MatchValue::Text(t) if t == s)
    }
}

impl From<&str> for MatchValue {
    fn from(s: &str) -> Self {
        MatchValue::Text(s.to_string())
    }
}

impl From<String> for MatchValue {
    fn from(s: String) -> Self {
        MatchValue::Text(s)
    }
}

impl From<u32> for MatchValue {
    fn from(n: u32) -> Self {
        MatchValue::Int(n.into())
    }
}

impl From<u64> for MatchValue {
    fn from(n: u64) -> Self {
        MatchValue::Int(n)
    }
}

impl<T: Into<MatchValue>> From<Option<T>> for MatchValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(MatchValue::Null, Into::into)
    }
}

impl fmt::Display for MatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchValue::Null => write!(f, "null"),
            MatchValue::Int(n) => write!(f, "{}", n),
            MatchValue::Text(s) => write!(f, "{}", s),
        }
    }
}

type LiteralFn = for<'a> fn(&'a dyn UrlMetadata) -> &'a str;
type DerivedFn = fn(&ResolvedName) -> MatchValue;

#[derive(Clone, Copy)]
enum Accessor {
    /// Field stored on the record itself.
    Literal(LiteralFn),
    /// Field decoded from the record's filename.
    Derived(DerivedFn),
}

fn get_detector(r: &dyn UrlMetadata) -> &str {
    r.detector()
}

fn get_format(r: &dyn UrlMetadata) -> &str {
    r.format()
}

fn get_url(r: &dyn UrlMetadata) -> &str {
    r.url()
}

fn get_observatory(n: &ResolvedName) -> MatchValue {
    MatchValue::Text(n.file.observatory.clone())
}

fn get_gps_start(n: &ResolvedName) -> MatchValue {
    MatchValue::Int(n.file.gps_start)
}

fn get_duration(n: &ResolvedName) -> MatchValue {
    MatchValue::Int(n.file.duration)
}

fn get_tag(n: &ResolvedName) -> MatchValue {
    n.release.as_ref().and_then(|r| r.tag.clone()).into()
}

fn get_sample_rate(n: &ResolvedName) -> MatchValue {
    n.release.as_ref().map(|r| r.sample_rate).into()
}

fn get_version(n: &ResolvedName) -> MatchValue {
    n.release.as_ref().map(|r| r.version).into()
}

const ACCESSORS: &[(&str, Accessor)] = &[
    ("detector", Accessor::Literal(get_detector)),
    ("format", Accessor::Literal(get_format)),
    ("url", Accessor::Literal(get_url)),
    ("observatory", Accessor::Derived(get_observatory)),
    ("gps_start", Accessor::Derived(get_gps_start)),
    ("duration", Accessor::Derived(get_duration)),
    ("tag", Accessor::Derived(get_tag)),
    ("sample_rate", Accessor::Derived(get_sample_rate)),
    ("version", Accessor::Derived(get_version)),
];

fn lookup(key: &str) -> Result<Accessor> {
    ACCESSORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, accessor)| *accessor)
        .ok_or_else(|| Error::UnknownKey(key.to_string()))
}

/// Iterator returned by [`sieve`].
///
/// Yields matching records in input order. A record whose URL cannot be
/// parsed while evaluating a derived key is yielded as an `Err`.
pub struct Sieve<I> {
    records: I,
    literal: Vec<(LiteralFn, MatchValue)>,
    derived: Vec<(DerivedFn, MatchValue)>,
}

impl<I> Sieve<I>
where
    I: Iterator,
    I::Item: UrlMetadata,
{
    fn matches(&self, record: &I::Item) -> Result<bool> {
        let record: &dyn UrlMetadata = record;

        if !self
            .literal
            .iter()
            .all(|(get, expected)| expected.is_text(get(record)))
        {
            return Ok(false);
        }

        if self.derived.is_empty() {
            return Ok(true);
        }

        let name = parse_resolved(record.url())?;
        Ok(self
            .derived
            .iter()
            .all(|(get, expected)| get(&name) == *expected))
    }
}

impl<I> Iterator for Sieve<I>
where
    I: Iterator,
    I::Item: UrlMetadata,
{
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.next()?;
            match self.matches(&record) {
                Ok(true) => return Some(Ok(record)),
                Ok(false) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Lazily filter `records` down to those equal to every constraint.
///
/// Every constraint key is validated before this returns, so an unknown key
/// fails with [`Error::UnknownKey`] without consuming any record.
pub fn sieve<I, K>(records: I, constraints: &[(K, MatchValue)]) -> Result<Sieve<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: UrlMetadata,
    K: AsRef<str>,
{
    let mut literal = Vec::new();
    let mut derived = Vec::new();

    for (key, value) in constraints {
        match lookup(key.as_ref())? {
            Accessor::Literal(get) => literal.push((get, value.clone())),
            Accessor::Derived(get) => derived.push((get, value.clone())),
        }
    }

    Ok(Sieve {
        records: records.into_iter(),
        literal,
        derived,
    })
}
