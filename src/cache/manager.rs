//! Snapshot store for state that should outlive the process
//!
//! Provides a `CacheManager` that writes serializable snapshots to JSON files
//! with an expiry timestamp. Expired snapshots are still readable and flagged,
//! so callers decide whether stale data is better than none.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// On-disk layout of a snapshot
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    saved_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    data: T,
}

/// A snapshot read back from disk
#[derive(Debug)]
pub struct CachedData<T> {
    pub data: T,
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// Whether the snapshot is past its TTL
    pub is_expired: bool,
}

/// Reads and writes snapshots under a cache directory
///
/// Defaults to the XDG cache directory for `ecweather`
/// (`~/.cache/ecweather/` on Linux).
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a CacheManager in the platform cache directory
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "ecweather")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a CacheManager rooted at `cache_dir`
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Path of the snapshot file for `key`
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced so keys built from
    /// site and province codes stay valid file names.
    fn snapshot_path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{}.json", file_stem))
    }

    /// Writes `data` under `key`, fresh for `ttl_hours`
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl_hours: u64) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let saved_at = Utc::now();
        let snapshot = Snapshot {
            saved_at,
            expires_at: saved_at + Duration::hours(ttl_hours as i64),
            data,
        };

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(self.snapshot_path(key), json)
    }

    /// Reads the snapshot stored under `key`
    ///
    /// Returns `None` if there is no snapshot or it no longer parses as `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.snapshot_path(key)).ok()?;
        let snapshot: Snapshot<T> = serde_json::from_str(&content).ok()?;

        Some(CachedData {
            data: snapshot.data,
            saved_at: snapshot.saved_at,
            is_expired: Utc::now() > snapshot.expires_at,
        })
    }

    /// Deletes the snapshot for `key`; a missing snapshot is not an error
    pub fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.snapshot_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
