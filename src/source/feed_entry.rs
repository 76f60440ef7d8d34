//! The normalized record shared by the fetcher, the snapshot store and the
//! dashboard.
//!
//! Sources hand back loosely-typed [`RawEntry`] values; [`FeedEntry::normalize`]
//! is the single place where they become complete records.
//!
//! The serialized field names (`title`, `link`, `size`, `seeders`,
//! `published`) are the on-disk snapshot format. Renaming a field here breaks
//! every snapshot already written.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One upstream item as the source saw it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub size: Option<String>,
    /// Left unparsed; upstream sends it as text.
    pub seeders: Option<String>,
    pub published: Option<String>,
}

/// A single feed listing, fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Display name. Also the input to keyword matching.
    pub title: String,

    /// Download URL.
    pub link: String,

    /// Human-readable size exactly as upstream wrote it (e.g. `1.4 GiB`).
    pub size: String,

    /// Seeder count. Absent or non-numeric upstream values become 0.
    #[serde(default)]
    pub seeders: u32,

    /// Upstream timestamp, passed through verbatim.
    pub published: String,
}

impl FeedEntry {
    /// Turn a raw upstream entry into a complete record.
    ///
    /// `index` is the entry's position in the feed and only appears in the
    /// error. Missing title, link or publish time is a
    /// [`FetchError::MalformedEntry`]; a missing size becomes the empty
    /// string.
    pub fn normalize(raw: RawEntry, index: usize) -> Result<Self, FetchError> {
        let missing = |field: &str| FetchError::MalformedEntry {
            index,
            reason: format!("missing {field}"),
        };

        Ok(Self {
            title: raw.title.ok_or_else(|| missing("title"))?,
            link: raw.link.ok_or_else(|| missing("link"))?,
            size: raw.size.unwrap_or_default(),
            seeders: parse_seeders(raw.seeders.as_deref()),
            published: raw.published.ok_or_else(|| missing("published"))?,
        })
    }
}

fn parse_seeders(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
