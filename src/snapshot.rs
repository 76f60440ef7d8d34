//! The "latest" snapshot on disk.
//!
//! A snapshot is a pretty-printed JSON array of [`FeedEntry`] records. Every
//! save replaces the file wholesale: the new content is written to a sibling
//! `.tmp` file and renamed over the target, so readers see either the old
//! snapshot or the new one. There is no cross-process locking; runs are
//! expected to be serialized by whatever schedules them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SnapshotError;
use crate::source::{FeedEntry, Snapshot};

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored snapshot with `entries`.
    pub fn save(&self, entries: &[FeedEntry]) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(entries).map_err(SnapshotError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|source| SnapshotError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;

        debug!(path = %self.path.display(), entries = entries.len(), "snapshot saved");
        Ok(())
    }

    /// Read the stored snapshot back.
    pub fn load(&self) -> Result<Snapshot, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SnapshotError::Missing(self.path.clone()));
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(title: &str, seeders: u32) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: format!("https://example.com/{seeders}.torrent"),
            size: "1.4 GiB".to_string(),
            seeders,
            published: "Mon, 01 Jan 2024 00:00:00 -0000".to_string(),
        }
    }

    #[test]
    fn save_load_save_is_stable_with_non_ascii() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("latest.json"));
        let snapshot = vec![
            entry("無修正 テスト", 10),
            entry("Ünïcödé — ÄÖÜ", 0),
            entry("plain ascii", 4_000_000),
        ];

        store.save(&snapshot).unwrap();
        let first_bytes = fs::read(store.path()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, snapshot);

        store.save(&loaded).unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), first_bytes);
        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("latest.json"));
        store.save(&[entry("無修正", 1)]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("無修正"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn uses_the_documented_field_names() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("latest.json"));
        store.save(&[entry("t", 3)]).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        let obj = value[0].as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["link", "published", "seeders", "size", "title"]);
        assert_eq!(obj["seeders"], 3);
    }

    #[test]
    fn second_save_fully_replaces_the_first() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("latest.json"));

        store
            .save(&[entry("a1", 1), entry("a2", 2), entry("a3", 3)])
            .unwrap();
        store.save(&[entry("b1", 9)]).unwrap();

        assert_eq!(store.load().unwrap(), vec![entry("b1", 9)]);
    }

    #[test]
    fn empty_snapshot_round_trips() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("latest.json"));
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data").join("nested").join("latest.json"));
        store.save(&[entry("x", 1)]).unwrap();

        assert!(store.path().exists());
        let names: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, ["latest.json"]);
    }

    #[test]
    fn load_missing_file_is_missing_error() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nope.json"));
        assert!(matches!(store.load(), Err(SnapshotError::Missing(_))));
    }

    #[test]
    fn load_garbage_is_corrupt_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latest.json");
        for garbage in ["not json", "{\"title\": \"x\"}", "[{\"title\": 1}]", "[{\"seeders\": -1}]"] {
            fs::write(&path, garbage).unwrap();
            let store = SnapshotStore::new(&path);
            assert!(
                matches!(store.load(), Err(SnapshotError::Corrupt { .. })),
                "{garbage:?} should be corrupt"
            );
        }
    }
}
