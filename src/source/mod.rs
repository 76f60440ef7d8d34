//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the record types shared
//! by every backend. Concrete backends live in sub-modules (currently only
//! [`rss`]).
//!
//! ## For contributors — adding a new backend
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomSource`) and implement [`FeedSource`] for it.
//! 3. Add `mod atom;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of [`RssSource`].
//!
//! The retry loop in [`crate::fetch`] only ever sees the trait.

mod feed_entry;
mod rss;

pub use feed_entry::{FeedEntry, RawEntry};
pub use rss::RssSource;

use crate::error::SourceError;

/// An ordered list of entries, in feed order at fetch time.
pub type Snapshot = Vec<FeedEntry>;

/// Anything that can turn a URL into a list of raw feed entries.
///
/// ## Implementing a new backend
///
/// ```ignore
/// pub struct MySource { /* client, credentials, ... */ }
///
/// impl FeedSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     fn retrieve(&self, url: &str) -> Result<Vec<RawEntry>, SourceError> {
///         // Perform HTTP / IO, then convert into RawEntry values.
///         todo!()
///     }
/// }
/// ```
pub trait FeedSource {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Retrieve and parse the feed once. No retrying here; that is the
    /// caller's job.
    fn retrieve(&self, url: &str) -> Result<Vec<RawEntry>, SourceError>;
}

impl<T: FeedSource + ?Sized> FeedSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn retrieve(&self, url: &str) -> Result<Vec<RawEntry>, SourceError> {
        (**self).retrieve(url)
    }
}
