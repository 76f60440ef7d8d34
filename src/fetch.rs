//! Fetch-with-retry.
//!
//! Runs on the calling thread: each attempt retrieves the whole feed and
//! normalizes every entry. Any failure, whether transport, parse, or a
//! single malformed entry, fails the attempt as a whole, so a caller either
//! gets a complete snapshot or an error. Between attempts the loop blocks for
//! the configured delay; there is no cancellation.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::source::{FeedEntry, FeedSource, Snapshot};

/// How many times to try, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

/// The blocking pause between attempts.
///
/// Split out so tests can count delays without sleeping.
pub trait Pause {
    fn pause(&mut self, delay: Duration);
}

impl<P: Pause + ?Sized> Pause for &mut P {
    fn pause(&mut self, delay: Duration) {
        (**self).pause(delay);
    }
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Drives a [`FeedSource`] until it yields a full snapshot or the retry
/// budget runs out.
pub struct Fetcher<S, P = ThreadSleep> {
    source: S,
    pause: P,
    policy: RetryPolicy,
}

impl<S: FeedSource> Fetcher<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self::with_pause(source, policy, ThreadSleep)
    }
}

impl<S: FeedSource, P: Pause> Fetcher<S, P> {
    pub fn with_pause(source: S, policy: RetryPolicy, pause: P) -> Self {
        Self {
            source,
            pause,
            policy,
        }
    }

    /// Fetch `url`, retrying up to `max_attempts` times.
    ///
    /// The first successful attempt returns immediately. After the last
    /// failure the result is [`FetchError::Exhausted`] wrapping the final
    /// cause.
    pub fn fetch(&mut self, url: &str) -> Result<Snapshot, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::InvalidRequest("feed url is empty".into()));
        }
        let max = self.policy.max_attempts;
        if max == 0 {
            return Err(FetchError::InvalidRequest(
                "max_attempts must be at least 1".into(),
            ));
        }

        let mut attempt = 1;
        loop {
            match self.attempt(url) {
                Ok(snapshot) => {
                    info!(
                        source = self.source.name(),
                        attempt,
                        entries = snapshot.len(),
                        "feed fetched"
                    );
                    return Ok(snapshot);
                }
                Err(err) => {
                    warn!(source = self.source.name(), "fetch failed ({attempt}/{max}): {err}");
                    if attempt >= max {
                        return Err(FetchError::Exhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    self.pause.pause(self.policy.delay);
                    attempt += 1;
                }
            }
        }
    }

    /// One retrieval plus normalization of every entry.
    fn attempt(&self, url: &str) -> Result<Snapshot, FetchError> {
        let raw = self.source.retrieve(url)?;
        debug!(entries = raw.len(), "retrieved raw entries");
        raw.into_iter()
            .enumerate()
            .map(|(index, entry)| FeedEntry::normalize(entry, index))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
