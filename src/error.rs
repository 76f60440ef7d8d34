//! Error types for each stage of the pipeline.
//!
//! - [`SourceError`]: one retrieval from a [`FeedSource`](crate::source::FeedSource) failed
//! - [`FetchError`]: the retry loop's view of failures, including exhaustion
//! - [`SnapshotError`]: reading or writing the persisted snapshot
//! - [`ConfigError`]: loading `tasks.json`
//!
//! `main` wraps all of these in `anyhow` with context before exiting.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single retrieval attempt failed at the transport or parsing layer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status code: {0}")]
    HttpStatus(u16),

    #[error("feed parse error: {0}")]
    Parse(#[from] rss::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid fetch request: {0}")]
    InvalidRequest(String),

    /// Network or parse failure during one attempt. Retried.
    #[error("transient fetch failure: {0}")]
    Transient(#[from] SourceError),

    /// An upstream entry lacks a required field. Fails the whole attempt.
    #[error("malformed entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("feed fetch failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot at {}", .0.display())]
    Missing(PathBuf),

    #[error("snapshot at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("snapshot io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}
