//! Error types for LOSC operations.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse LOSC JSON from '{url}': {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid LOSC filename: {0}")]
    Format(String),

    #[error("Invalid data-quality flag {0:?}: expected <DETECTOR>_<NAME>")]
    InvalidFlag(String),

    #[error("unknown LOSC url metadata key '{0}'")]
    UnknownKey(String),

    #[error(
        "multiple LOSC URL tags discovered in dataset, please select one of: {}",
        format_tags(.0)
    )]
    AmbiguousTag(Vec<Option<String>>),

    #[error("Invalid segment: start {start} is after end {end}")]
    InvalidSegment { start: u64, end: u64 },

    #[error("{0}")]
    NotFound(String),
}

fn format_tags(tags: &[Option<String>]) -> String {
    tags.iter()
        .map(|t| t.as_deref().unwrap_or("untagged"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
