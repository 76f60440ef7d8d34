//! RSS feed source implementation.
//!
//! Fetches an RSS 2.0 document over HTTP with [`reqwest`]'s blocking client
//! and parses it with the [`rss`] crate. Torrent trackers in the nyaa family
//! publish size and seeder count as `nyaa:`-prefixed extension elements:
//!
//! ```xml
//! <item>
//!   <title>...</title>
//!   <link>https://.../download/1.torrent</link>
//!   <pubDate>Mon, 01 Jan 2024 00:00:00 -0000</pubDate>
//!   <nyaa:seeders>12</nyaa:seeders>
//!   <nyaa:size>1.4 GiB</nyaa:size>
//! </item>
//! ```

use std::time::Duration;

use reqwest::blocking::Client;

use super::{FeedSource, RawEntry};
use crate::error::SourceError;

/// Namespace prefix of the tracker's extension elements.
const NYAA_PREFIX: &str = "nyaa";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An RSS feed source backed by a blocking HTTP client.
pub struct RssSource {
    client: Client,
    /// A human-readable label used in log lines.
    label: String,
}

impl RssSource {
    /// Create a new RSS source with its own HTTP client.
    pub fn new(label: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            label: label.into(),
        })
    }

    /// Parse an already-fetched [`rss::Channel`] into [`RawEntry`]s.
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// parsing logic without hitting the network.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<RawEntry> {
        channel
            .items()
            .iter()
            .map(|item| RawEntry {
                title: item.title().map(String::from),
                link: item.link().map(String::from),
                size: nyaa_value(item, "size"),
                seeders: nyaa_value(item, "seeders"),
                published: item.pub_date().map(String::from),
            })
            .collect()
    }
}

/// Text content of the first `<nyaa:{name}>` element on `item`, if any.
fn nyaa_value(item: &rss::Item, name: &str) -> Option<String> {
    item.extensions()
        .get(NYAA_PREFIX)
        .and_then(|elements| elements.get(name))
        .and_then(|values| values.first())
        .and_then(|ext| ext.value())
        .map(String::from)
}

impl FeedSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn retrieve(&self, url: &str) -> Result<Vec<RawEntry>, SourceError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(items: &str) -> rss::Channel {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:nyaa="https://sukebei.nyaa.si/xmlns/nyaa">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com/</link>
    <description>test</description>
    {items}
  </channel>
</rss>"#
        );
        rss::Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn parse_channel_extracts_items_in_feed_order() {
        let channel = channel(
            r#"
    <item>
      <title>First Post</title>
      <link>https://example.com/1.torrent</link>
      <pubDate>Mon, 01 Jan 2024 00:00:00 -0000</pubDate>
      <nyaa:seeders>12</nyaa:seeders>
      <nyaa:size>1.4 GiB</nyaa:size>
    </item>
    <item>
      <title>Second Post</title>
      <link>https://example.com/2.torrent</link>
      <pubDate>Tue, 02 Jan 2024 12:00:00 -0000</pubDate>
      <nyaa:seeders>3</nyaa:seeders>
      <nyaa:size>700.0 MiB</nyaa:size>
    </item>"#,
        );
        let entries = RssSource::parse_channel(&channel);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("First Post"));
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/1.torrent"));
        assert_eq!(entries[0].seeders.as_deref(), Some("12"));
        assert_eq!(entries[0].size.as_deref(), Some("1.4 GiB"));
        assert_eq!(
            entries[0].published.as_deref(),
            Some("Mon, 01 Jan 2024 00:00:00 -0000")
        );
        assert_eq!(entries[1].title.as_deref(), Some("Second Post"));
        assert_eq!(entries[1].size.as_deref(), Some("700.0 MiB"));
    }

    #[test]
    fn missing_extensions_come_back_as_none() {
        let channel = channel(
            r#"
    <item>
      <title>Plain item</title>
      <link>https://example.com/plain</link>
      <pubDate>Mon, 01 Jan 2024 00:00:00 -0000</pubDate>
    </item>"#,
        );
        let entries = RssSource::parse_channel(&channel);

        assert!(entries[0].seeders.is_none());
        assert!(entries[0].size.is_none());
    }

    #[test]
    fn non_ascii_titles_are_preserved() {
        let channel = channel(
            r#"
    <item>
      <title>無修正 テスト 4K</title>
      <link>https://example.com/jp</link>
      <pubDate>Mon, 01 Jan 2024 00:00:00 -0000</pubDate>
    </item>"#,
        );
        let entries = RssSource::parse_channel(&channel);
        assert_eq!(entries[0].title.as_deref(), Some("無修正 テスト 4K"));
    }

    #[test]
    fn name_returns_label() {
        let src = RssSource::new("tracker").unwrap();
        assert_eq!(src.name(), "tracker");
    }
}
