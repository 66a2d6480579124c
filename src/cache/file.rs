//! File-backed store persisting cache entries to disk
//!
//! Each entry is written as a small JSON file (`{"data": ..., "expire": ...}`)
//! in an XDG-compliant cache directory, so responses survive restarts when the
//! startup flush is disabled.

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::store::{CacheEntry, Store, StoreError};

/// Stores cache entries as JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore using the XDG cache directory
    ///
    /// Uses `~/.cache/cityweather/` on Linux, or the platform equivalent.
    /// Returns `None` if the cache directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "cityweather")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a FileStore rooted at a specific directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of the file holding `key`
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", file_stem(key)))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }
}

/// Maps a cache key onto a portable file name
///
/// Keys contain path separators and query punctuation (`/current.json`,
/// `lang=zh`), so every byte outside `[A-Za-z0-9-._~]` is percent-encoded.
/// Distinct keys always get distinct names, and the encoding of a prefix is
/// a prefix of the encoding of every key that starts with it.
fn file_stem(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let content = match fs::read_to_string(self.cache_path(key)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let json = serde_json::to_string(entry)?;
        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.cache_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, StoreError> {
        let read_dir = match fs::read_dir(&self.cache_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let prefix = file_stem(prefix);
        let mut removed = 0;

        for dir_entry in read_dir {
            let path = dir_entry?.path();
            let is_match = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem.starts_with(&prefix));

            if is_match {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
