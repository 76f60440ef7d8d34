//! feed-dashboard — snapshot a torrent RSS feed and render it as a
//! keyword-filterable HTML table.
//!
//! ## Architecture overview
//!
//! ```text
//!            fetch                              render
//! ┌──────────┐  RawEntry  ┌──────────┐  JSON  ┌─────────────┐  HTML  ┌──────────┐
//! │ source/  │ ─────────► │ fetch.rs │ ─────► │ snapshot.rs │ ─────► │dashboard/│
//! │ (rss)    │            │ (retry)  │        │ (latest)    │        │          │
//! └──────────┘            └──────────┘        └─────────────┘        └──────────┘
//! ```
//!
//! * **`source/`** — the `FeedSource` trait, `FeedEntry`, and the RSS backend.
//! * **`fetch`** — bounded retry around one `FeedSource`.
//! * **`snapshot`** — full-replace JSON persistence of the latest fetch.
//! * **`dashboard`** — keyword tagging, the view model, and its HTML form.
//! * **`config`** — `tasks.json`, read once and passed down.
//! * **`main`** — argument parsing, logging setup, and the two subcommands.
//!
//! The two subcommands are meant to be run by an outside scheduler, one at a
//! time.

mod config;
mod dashboard;
mod error;
mod fetch;
mod snapshot;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, DEFAULT_CONFIG_PATH};
use fetch::Fetcher;
use snapshot::SnapshotStore;
use source::RssSource;

const USAGE: &str = "usage: feed-dashboard <fetch|render> [--config PATH]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Fetch,
    Render,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    config: PathBuf,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let command = match args.next()?.as_str() {
        "fetch" => Command::Fetch,
        "render" => Command::Render,
        _ => return None,
    };

    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => config = PathBuf::from(args.next()?),
            _ => return None,
        }
    }

    Some(Args { command, config })
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn run_fetch(config: &Config) -> Result<()> {
    let source = RssSource::new("rss").context("building HTTP client")?;
    let mut fetcher = Fetcher::new(source, config.retry_policy());
    let snapshot = fetcher
        .fetch(&config.rss_url)
        .with_context(|| format!("fetching {}", config.rss_url))?;

    let store = SnapshotStore::new(&config.snapshot_path);
    store.save(&snapshot).context("saving snapshot")?;

    println!(
        "[{}] fetched {} entries → {}",
        Local::now().date_naive().format("%Y-%m-%d"),
        snapshot.len(),
        store.path().display()
    );
    Ok(())
}

fn run_render(config: &Config) -> Result<()> {
    let store = SnapshotStore::new(&config.snapshot_path);
    let snapshot = store.load().context("loading snapshot")?;
    info!(entries = snapshot.len(), "snapshot loaded");

    let view = dashboard::render(&snapshot, &config.vocabulary(), Local::now().date_naive());
    let markup = dashboard::html::to_html(&view);
    dashboard::html::save(&config.dashboard_path, &markup).with_context(|| {
        format!("writing dashboard {}", config.dashboard_path.display())
    })?;

    println!("dashboard updated → {}", config.dashboard_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries only the completion line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let config = Config::load(&args.config)?;

    match args.command {
        Command::Fetch => run_fetch(&config)?,
        Command::Render => run_render(&config)?,
    }
    Ok(ExitCode::SUCCESS)
}
